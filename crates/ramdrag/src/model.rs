//! Ram drag coefficient as a function of Mach number.

/// Mean nozzle exit velocity relative to freestream, roughly what a turbojet produces.
pub const AVG_NOZZLE_VEL_RELATIVE_TO_FREESTREAM: f64 = 0.25;
pub const AVG_NOZZLE_VEL_FACTOR: f64 =
    AVG_NOZZLE_VEL_RELATIVE_TO_FREESTREAM * (1.0 - AVG_NOZZLE_VEL_RELATIVE_TO_FREESTREAM);

/// Inlet contribution, assuming inlet and nozzle areas are equal.
const INLET_DRAG: f64 = 0.1;

/// Drag per unit intake area at the given Mach number.
///
/// Equals 0.475 at rest and decreases monotonically towards 0.1.
pub fn drag_per_area(mach: f64) -> f64 {
    let nozzle = 2.0 / (mach * mach + 1.0) * AVG_NOZZLE_VEL_FACTOR;
    nozzle + INLET_DRAG
}

/// Ram drag per unit area after the throttle offset.
pub fn ram_drag(mach: f64, mean_throttle: f64) -> f64 {
    drag_per_area(mach) * (1.0 - mean_throttle.clamp(0.0, 1.0))
}
