//! Core units, constants, and shared primitives for the aerodynamic response workspace.

pub mod environment;
pub mod time;

/// Physical and model constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Resource name carried by air-breathing engines as a propellant.
    pub const INTAKE_AIR: &str = "IntakeAir";
    /// Unit-scale normalization applied to intake ram drag forces.
    pub const RAM_DRAG_FORCE_SCALE: f64 = 100.0;
    /// Divisor converting `rho * v^2 * area` into canopy drag force units.
    pub const CANOPY_DRAG_DIVISOR: f64 = 2000.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use std::f64::consts::PI;

    /// Area of a circle of the given diameter.
    #[inline]
    pub fn circle_area(diameter: f64) -> f64 {
        diameter * diameter * PI / 4.0
    }

    /// Linear interpolation between `a` and `b`, with `t` clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + (b - a) * t.clamp(0.0, 1.0)
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in metres, m/s or newtons depending on context.
    pub type Vector3 = [f64; 3];

    pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(v: &Vector3) -> f64 {
        dot(v, v)
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector in the direction of `v`, or zero for a zero-length input.
    #[inline]
    pub fn normalize(v: &Vector3) -> Vector3 {
        let n = norm(v);
        if n > 0.0 { scale(v, 1.0 / n) } else { ZERO }
    }
}
