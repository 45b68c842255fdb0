//! Per-tick environment snapshots supplied by the host simulator.

use crate::vector::{self, Vector3};

/// Flight state sampled once per physics tick.
///
/// Pressures are in atmospheres, density in kg/m³, velocities in m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightConditions {
    pub mach: f64,
    pub dynamic_pressure: f64,
    pub static_pressure_atm: f64,
    pub density_kg_m3: f64,
    /// Altitude above terrain; may be negative over water.
    pub true_altitude_m: f64,
    /// Landed or splashed with horizontal speed below the auto-cut threshold.
    pub ground_stop: bool,
    /// Only consulted when explaining a failed deployment.
    pub shielded: bool,
    /// Rigid-body velocity of the vessel.
    pub velocity: Vector3,
    /// Offset between the physics frame and the inertial frame (floating-origin velocity).
    pub frame_velocity: Vector3,
}

impl Default for FlightConditions {
    fn default() -> Self {
        Self {
            mach: 0.0,
            dynamic_pressure: 0.0,
            static_pressure_atm: 0.0,
            density_kg_m3: 0.0,
            true_altitude_m: 0.0,
            ground_stop: false,
            shielded: false,
            velocity: vector::ZERO,
            frame_velocity: vector::ZERO,
        }
    }
}

impl FlightConditions {
    /// Velocity corrected for the frame offset.
    pub fn surface_velocity(&self) -> Vector3 {
        vector::add(&self.velocity, &self.frame_velocity)
    }

    /// Unit vector along the corrected velocity.
    pub fn velocity_direction(&self) -> Vector3 {
        vector::normalize(&self.surface_velocity())
    }

    /// Squared magnitude of the corrected velocity.
    pub fn speed_squared(&self) -> f64 {
        vector::norm_squared(&self.surface_velocity())
    }

    /// True when there is no atmosphere at all.
    pub fn in_vacuum(&self) -> bool {
        self.static_pressure_atm <= 0.0
    }
}

/// Whether a vessel counts as stopped on the ground.
pub fn ground_stop(landed_or_splashed: bool, horizontal_speed: f64, auto_cut_speed: f64) -> bool {
    landed_or_splashed && horizontal_speed < auto_cut_speed
}

/// Altitude above terrain from altitude above sea level.
///
/// Terrain below sea level on a body with oceans is ignored (the sea surface counts as ground).
pub fn true_altitude(asl_m: f64, terrain_altitude_m: Option<f64>, has_ocean: bool) -> f64 {
    match terrain_altitude_m {
        Some(terrain) if !has_ocean || terrain > 0.0 => asl_m - terrain,
        _ => asl_m,
    }
}
