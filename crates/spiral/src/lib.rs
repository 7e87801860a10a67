//! Parker spiral geometry: footprints of spacecraft field lines on a reference
//! sphere, and the spiral curve reconstructed from a footprint.
//!
//! The field line through a point corotates with the Sun while the wind carries
//! it outward at constant radial speed `Vr`, so `dphi/dr = -w_sun / Vr` along the
//! line. Integrating between the reference sphere `b` and the spacecraft radius
//! gives the closed form used throughout:
//!
//! ```text
//! C    = Vr / (w_sun * b * sin(theta))
//! phib = phi0 + (r0/b - 1 - ln(r0/b)) / C
//! ```

pub mod batch;
pub mod model;

pub use batch::{FOOTPRINT_FIELD, FOOTPRINT_LEGENDS, compute_footprint_batch};
pub use model::{
    CurvePoint, Footprint, ParkerSpiral, SpiralParameters, StatePoint, compute_footprint, linspace,
    reconstruct, trace_curve,
};

use solar_series::{DimensionError, SeriesError};
use thiserror::Error;

/// Inputs outside the domain of the closed-form relations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("radius must be positive, got {0} m")]
    NonPositiveRadius(f64),
    #[error("reference sphere radius must be positive and finite, got {0} m")]
    NonPositiveReference(f64),
    #[error("rotation period must be positive and finite, got {0} s")]
    NonPositivePeriod(f64),
    #[error("radius ratio must be positive to take its logarithm, got {0}")]
    NonPositiveRatio(f64),
    #[error("polar angle {0} rad lies on a pole singularity")]
    PoleSingularity(f64),
    #[error("polar angle {0} rad is outside [0, π]")]
    PolarAngleOutOfRange(f64),
    #[error("radial wind speed must be non-zero")]
    ZeroSpeed,
}

#[derive(Debug, Error)]
pub enum SpiralError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Dimension(#[from] DimensionError),
    #[error("position series has {positions} samples but speed series has {speeds}")]
    ShapeMismatch { positions: usize, speeds: usize },
    #[error("field '{field}' has {found} columns, expected {expected}")]
    Columns {
        field: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Series(#[from] SeriesError),
}
