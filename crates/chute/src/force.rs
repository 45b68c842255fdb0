//! Canopy drag force.

use aero_core::constants::CANOPY_DRAG_DIVISOR;
use aero_core::environment::FlightConditions;
use aero_core::vector::{self, Vector3};

/// Drag magnitude for the given density, squared speed and canopy area.
pub fn drag_magnitude(density_kg_m3: f64, speed_squared: f64, area_m2: f64) -> f64 {
    density_kg_m3 * speed_squared * area_m2 / CANOPY_DRAG_DIVISOR
}

/// Unit vector opposing the frame-corrected velocity (zero when at rest).
pub fn drag_direction(conditions: &FlightConditions) -> Vector3 {
    vector::scale(&conditions.velocity_direction(), -1.0)
}

/// Drag force acting on a canopy of `area_m2`.
pub fn drag_force(conditions: &FlightConditions, area_m2: f64) -> Vector3 {
    let magnitude = drag_magnitude(
        conditions.density_kg_m3,
        conditions.speed_squared(),
        area_m2,
    );
    vector::scale(&drag_direction(conditions), magnitude)
}
