//! Core constants, unit-tagged quantities, and shared geometry primitives for the
//! Parker footprint workspace.

pub mod spherical;
pub mod units;

/// Physical constants expressed in kilometres and seconds (unless stated otherwise).
pub mod constants {
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Nominal solar radius (IAU 2015) in kilometres.
    pub const SOLAR_RADIUS_KM: f64 = 695_700.0;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Synodic (Carrington) rotation period of the Sun in days.
    pub const SOLAR_ROTATION_PERIOD_DAYS: f64 = 27.275_261_2;
    /// Default footprint sphere radius, in solar radii.
    pub const DEFAULT_REFERENCE_RADIUS_SOLAR_RADII: f64 = 10.0;
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a Cartesian 3-vector in whatever length unit the caller tracks.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }
}
