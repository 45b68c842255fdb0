//! Aerodynamic force response for a host flight simulator.
//!
//! Two subsystems live here: intake ram drag for air-breathing engines and the parachute
//! deployment sequence. Both are evaluated once per physics tick against a snapshot the
//! host provides; the host integrates the resulting forces.

pub mod scenario;

pub use aero_chute as chute;
pub use aero_config as config;
pub use aero_core as primitives;
pub use aero_export as export;
pub use aero_ramdrag as ramdrag;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
