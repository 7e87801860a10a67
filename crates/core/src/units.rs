//! Solar quantities on top of `uom`'s SI types.
//!
//! Lengths, times, angles and speeds are `uom::si::f64` quantities, so mixing
//! them up is a compile error. This module only adds the units `uom` lacks
//! (the solar radius) and the solar rotation rate.

use std::f64::consts::TAU;

use uom::si::angular_velocity::radian_per_second;
use uom::si::f64::{AngularVelocity, Length, Time};
use uom::si::length::kilometer;
use uom::si::time::{day, second};

use crate::constants::{SOLAR_RADIUS_KM, SOLAR_ROTATION_PERIOD_DAYS};

pub use uom::si::f64::{Angle, Ratio, Velocity};

/// `n` nominal solar radii.
pub fn solar_radii(n: f64) -> Length {
    Length::new::<kilometer>(n * SOLAR_RADIUS_KM)
}

/// `length` expressed in nominal solar radii.
pub fn in_solar_radii(length: Length) -> f64 {
    length.get::<kilometer>() / SOLAR_RADIUS_KM
}

/// Angular rate `2π rad / period`.
pub fn angular_rate(period: Time) -> AngularVelocity {
    AngularVelocity::new::<radian_per_second>(TAU / period.get::<second>())
}

pub fn solar_rotation_period() -> Time {
    Time::new::<day>(SOLAR_ROTATION_PERIOD_DAYS)
}

/// `w_sun = 2π rad / T_sun`.
pub fn solar_angular_rate() -> AngularVelocity {
    angular_rate(solar_rotation_period())
}
