//! Canopy geometry and time-parameterised area growth.

use aero_core::units::{circle_area, lerp};

/// Canopy mass per square metre of deployed area (t/m²).
pub const AREA_DENSITY: f64 = 0.000058;
/// Cost per square metre of deployed area.
pub const AREA_COST: f64 = 0.075;

/// Canopy diameters in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanopyGeometry {
    pub pre_deployed_diameter: f64,
    pub deployed_diameter: f64,
}

impl Default for CanopyGeometry {
    fn default() -> Self {
        Self {
            pre_deployed_diameter: 1.0,
            deployed_diameter: 25.0,
        }
    }
}

impl CanopyGeometry {
    pub fn deployed_area(&self) -> f64 {
        circle_area(self.deployed_diameter)
    }

    /// Mass of the canopy fabric.
    pub fn chute_mass(&self) -> f64 {
        self.deployed_area() * AREA_DENSITY
    }

    pub fn module_cost(&self) -> f64 {
        (self.deployed_area() * AREA_COST).round()
    }
}

/// Canopy area after `elapsed` seconds of a phase lasting `duration` seconds.
///
/// Diameter is interpolated linearly between the phase endpoints, so area grows with the
/// square of elapsed time. A non-positive duration means the phase completes instantly.
pub fn canopy_area(elapsed: f64, duration: f64, start_diameter: f64, end_diameter: f64) -> f64 {
    let fraction = if duration > 0.0 {
        (elapsed / duration).clamp(0.0, 1.0)
    } else {
        1.0
    };
    circle_area(lerp(start_diameter, end_diameter, fraction))
}
