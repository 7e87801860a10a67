//! Parker spiral footprints of solar-wind spacecraft.
//!
//! The geometry lives in [`spiral`]; this crate ties it to telemetry sources,
//! configuration and export so that several spacecraft can be traced onto the
//! same reference sphere and compared.

pub mod pipeline;

pub use solar_config as config;
pub use solar_core::{constants, spherical, units};
pub use solar_export as export;
pub use solar_series as series;
pub use solar_spiral as spiral;
