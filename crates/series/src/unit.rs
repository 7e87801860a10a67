//! Run-time unit tags for telemetry fields.
//!
//! Telemetry arrives with unit strings, so a field only knows its unit at run
//! time. A [`Unit`] records what kind of quantity the numbers are and how to
//! scale them to SI; the typed `uom` quantity is built when a value leaves the
//! field.

use std::f64::consts::PI;
use std::fmt;

use solar_core::constants::{AU_KM, SECONDS_PER_DAY, SOLAR_RADIUS_KM};
use thiserror::Error;
use uom::si::angle::radian;
use uom::si::f64::{Angle, Length, Velocity};
use uom::si::length::meter;
use uom::si::velocity::meter_per_second;

/// Kind of physical quantity a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Dimensionless,
    Length,
    Time,
    Angle,
    Velocity,
    AngularVelocity,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dimension::Dimensionless => "dimensionless",
            Dimension::Length => "length",
            Dimension::Time => "time",
            Dimension::Angle => "angle",
            Dimension::Velocity => "velocity",
            Dimension::AngularVelocity => "angular velocity",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot {op} {found} values, expected {expected}")]
pub struct DimensionError {
    pub op: &'static str,
    pub expected: Dimension,
    pub found: Dimension,
}

/// A named unit: its dimension and the factor onto the SI unit of that dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    symbol: &'static str,
    to_si: f64,
    dimension: Dimension,
}

impl Unit {
    pub const fn new(symbol: &'static str, to_si: f64, dimension: Dimension) -> Self {
        Self {
            symbol,
            to_si,
            dimension,
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.symbol
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Factor onto SI, provided the unit has the `expected` dimension.
    pub fn si_factor(&self, expected: Dimension, op: &'static str) -> Result<f64, DimensionError> {
        if self.dimension == expected {
            Ok(self.to_si)
        } else {
            Err(DimensionError {
                op,
                expected,
                found: self.dimension,
            })
        }
    }

    pub fn length(&self, value: f64) -> Result<Length, DimensionError> {
        let factor = self.si_factor(Dimension::Length, "read lengths from")?;
        Ok(Length::new::<meter>(value * factor))
    }

    pub fn velocity(&self, value: f64) -> Result<Velocity, DimensionError> {
        let factor = self.si_factor(Dimension::Velocity, "read speeds from")?;
        Ok(Velocity::new::<meter_per_second>(value * factor))
    }

    pub fn angle(&self, value: f64) -> Result<Angle, DimensionError> {
        let factor = self.si_factor(Dimension::Angle, "read angles from")?;
        Ok(Angle::new::<radian>(value * factor))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

pub const DIMENSIONLESS: Unit = Unit::new("", 1.0, Dimension::Dimensionless);
pub const METER: Unit = Unit::new("m", 1.0, Dimension::Length);
pub const KILOMETER: Unit = Unit::new("km", 1.0e3, Dimension::Length);
pub const ASTRONOMICAL_UNIT: Unit = Unit::new("AU", AU_KM * 1.0e3, Dimension::Length);
pub const SOLAR_RADIUS: Unit = Unit::new("R_sun", SOLAR_RADIUS_KM * 1.0e3, Dimension::Length);
pub const SECOND: Unit = Unit::new("s", 1.0, Dimension::Time);
pub const DAY: Unit = Unit::new("day", SECONDS_PER_DAY, Dimension::Time);
pub const RADIAN: Unit = Unit::new("rad", 1.0, Dimension::Angle);
pub const DEGREE: Unit = Unit::new("deg", PI / 180.0, Dimension::Angle);
pub const METER_PER_SECOND: Unit = Unit::new("m/s", 1.0, Dimension::Velocity);
pub const KILOMETER_PER_SECOND: Unit = Unit::new("km/s", 1.0e3, Dimension::Velocity);
pub const RADIAN_PER_SECOND: Unit = Unit::new("rad/s", 1.0, Dimension::AngularVelocity);
