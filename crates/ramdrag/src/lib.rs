//! Intake ram drag.
//!
//! Engines model ram drag at full throttle only; as throttle drops the captured airflow
//! still has to be decelerated by the intakes. This crate estimates that residual drag
//! from Mach number and mean throttle and posts it through each exposed intake.

pub mod applicator;
pub mod inventory;
pub mod model;

pub use applicator::{RamDragApplicator, RamDragHost, RamDragSample};
pub use inventory::{
    AeroSurface, EngineId, EngineModule, IntakeInventory, IntakeModule, PartId, TrackedIntake,
    TransformId, TransformLookup,
};
pub use model::{AVG_NOZZLE_VEL_FACTOR, drag_per_area, ram_drag};
