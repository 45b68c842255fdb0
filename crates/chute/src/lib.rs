//! Parachute deployment.
//!
//! A canopy is staged, waits (armed) until the atmosphere allows it to open, then unfolds
//! in two phases. Diameter grows linearly in each phase, so area and drag grow roughly
//! quadratically with time.

pub mod canopy;
pub mod delay;
pub mod events;
pub mod force;
pub mod parachute;
pub mod record;
pub mod spares;
pub mod state;

pub use canopy::{CanopyGeometry, canopy_area};
pub use delay::RandomDelay;
pub use events::{ChuteEvent, FailureReason};
pub use force::{drag_direction, drag_force, drag_magnitude};
pub use parachute::{ChuteSettings, Parachute, RepackAuthority, RepackRefusal};
pub use record::ChuteRecord;
pub use spares::SpareCount;
pub use state::DeploymentState;
