//! Cartesian → spherical conversion used by every footprint entry point.
//!
//! Convention: `theta` is the colatitude measured from the +z pole
//! (`cos(theta) = z / r`), `phi = atan2(y, x)` in `(-π, π]`. Latitude, where it
//! is reported, is always derived as `π/2 - theta`.

use std::f64::consts::FRAC_PI_2;

use crate::vector::{self, Vector3};

/// Spherical coordinates. `r` is in the same length unit as the Cartesian input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub r: f64,
    /// Colatitude in radians, `[0, π]`.
    pub theta: f64,
    /// Azimuth in radians, `(-π, π]`.
    pub phi: f64,
}

impl Spherical {
    pub fn from_cartesian(v: &Vector3) -> Self {
        let r = vector::norm(v);
        if r == 0.0 {
            return Self {
                r: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            r,
            theta: (v[2] / r).clamp(-1.0, 1.0).acos(),
            phi: v[1].atan2(v[0]),
        }
    }

    /// Latitude above the x-y plane in radians.
    pub fn latitude(&self) -> f64 {
        FRAC_PI_2 - self.theta
    }

    pub fn to_cartesian(&self) -> Vector3 {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let (sin_p, cos_p) = self.phi.sin_cos();
        [
            self.r * sin_t * cos_p,
            self.r * sin_t * sin_p,
            self.r * cos_t,
        ]
    }
}

/// Convert a Cartesian vector into [`Spherical`] coordinates.
#[inline]
pub fn cartesian_to_spherical(v: &Vector3) -> Spherical {
    Spherical::from_cartesian(v)
}
