//! Single-point footprints and spiral reconstruction.

use std::f64::consts::PI;

use solar_core::constants::DEFAULT_REFERENCE_RADIUS_SOLAR_RADII;
use solar_core::units::{angular_rate, solar_angular_rate, solar_radii, solar_rotation_period};
use uom::si::angle::{degree, radian};
use uom::si::angular_velocity::radian_per_second;
use uom::si::f64::{Angle, AngularVelocity, Length, Ratio, Time, Velocity};
use uom::si::length::meter;
use uom::si::ratio::ratio;
use uom::si::time::second;
use uom::si::velocity::meter_per_second;

use crate::{DomainError, SpiralError};

/// `|sin(theta)|` below this is treated as lying on the rotation axis.
pub const POLE_TOLERANCE: f64 = 1.0e-12;

/// Solar rotation and the radius of the footprint sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParameters {
    rotation_period: Time,
    angular_rate: AngularVelocity,
    reference_radius: Length,
}

impl SpiralParameters {
    /// Parameters for the standard solar rotation period and reference radius `b`.
    pub fn new(reference_radius: Length) -> Result<Self, SpiralError> {
        Self::with_rotation_period(solar_rotation_period(), reference_radius)
    }

    pub fn with_rotation_period(
        rotation_period: Time,
        reference_radius: Length,
    ) -> Result<Self, SpiralError> {
        let b = reference_radius.get::<meter>();
        if !(b > 0.0 && b.is_finite()) {
            return Err(DomainError::NonPositiveReference(b).into());
        }
        let period = rotation_period.get::<second>();
        if !(period > 0.0 && period.is_finite()) {
            return Err(DomainError::NonPositivePeriod(period).into());
        }
        Ok(Self {
            rotation_period,
            angular_rate: angular_rate(rotation_period),
            reference_radius,
        })
    }

    pub fn rotation_period(&self) -> Time {
        self.rotation_period
    }

    pub fn angular_rate(&self) -> AngularVelocity {
        self.angular_rate
    }

    pub fn reference_radius(&self) -> Length {
        self.reference_radius
    }
}

impl Default for SpiralParameters {
    fn default() -> Self {
        Self {
            rotation_period: solar_rotation_period(),
            angular_rate: solar_angular_rate(),
            reference_radius: solar_radii(DEFAULT_REFERENCE_RADIUS_SOLAR_RADII),
        }
    }
}

/// Spacecraft position in spherical coordinates plus the radial wind speed.
///
/// `theta` is the colatitude measured from the solar rotation axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatePoint {
    pub r: Length,
    pub theta: Angle,
    pub phi: Angle,
    pub vr: Velocity,
}

impl StatePoint {
    pub fn new(r: Length, theta: Angle, phi: Angle, vr: Velocity) -> Self {
        Self { r, theta, phi, vr }
    }
}

/// Where a traced field line meets the reference sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    theta: Angle,
    phi: Angle,
}

impl Footprint {
    pub fn new(theta: Angle, phi: Angle) -> Self {
        Self { theta, phi }
    }

    pub fn from_degrees(theta_deg: f64, phi_deg: f64) -> Self {
        Self::new(Angle::new::<degree>(theta_deg), Angle::new::<degree>(phi_deg))
    }

    /// Colatitude of the footprint.
    pub fn theta(&self) -> Angle {
        self.theta
    }

    pub fn phi(&self) -> Angle {
        self.phi
    }

    pub fn theta_deg(&self) -> f64 {
        self.theta.get::<degree>()
    }

    pub fn phi_deg(&self) -> f64 {
        self.phi.get::<degree>()
    }

    pub fn latitude_deg(&self) -> f64 {
        90.0 - self.theta_deg()
    }

    /// `(theta, phi)` in degrees.
    pub fn degrees(&self) -> (f64, f64) {
        (self.theta_deg(), self.phi_deg())
    }
}

/// One sample of a reconstructed spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub r: Length,
    pub phi: Angle,
}

/// A Parker spiral anchored at a footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkerSpiral {
    reference_radius: Length,
    theta: Angle,
    /// `C`, per radian.
    advection: f64,
    phib: Angle,
}

impl ParkerSpiral {
    /// Trace the spiral through `state` down to the reference sphere.
    pub fn new(state: &StatePoint, params: &SpiralParameters) -> Result<Self, SpiralError> {
        let b = params.reference_radius();
        let rb = radius_ratio(state.r, b)?;
        let advection = advection_constant(state.vr, state.theta, params)?;
        Ok(Self {
            reference_radius: b,
            theta: state.theta,
            advection,
            phib: state.phi + Angle::new::<radian>(winding(rb)? / advection),
        })
    }

    /// Rebuild the spiral from a stored footprint and the wind speed that produced it.
    pub fn from_footprint(
        footprint: &Footprint,
        vr: Velocity,
        params: &SpiralParameters,
    ) -> Result<Self, SpiralError> {
        let theta = footprint.theta();
        Ok(Self {
            reference_radius: params.reference_radius(),
            theta,
            advection: advection_constant(vr, theta, params)?,
            phib: footprint.phi(),
        })
    }

    /// Advection constant `C = Vr / (w_sun b sin(theta))`, in inverse radians.
    pub fn advection_constant(&self) -> f64 {
        self.advection
    }

    pub fn reference_radius(&self) -> Length {
        self.reference_radius
    }

    pub fn footprint(&self) -> Footprint {
        Footprint::new(self.theta, self.phib)
    }

    /// `(theta0, phib)` in degrees.
    pub fn get_footprint(&self) -> (f64, f64) {
        self.footprint().degrees()
    }

    /// Azimuth of the spiral at radius `r`.
    pub fn calculate_p(&self, r: Length) -> Result<Angle, SpiralError> {
        let rb = radius_ratio(r, self.reference_radius)?;
        Ok(self.phib - Angle::new::<radian>(winding(rb)? / self.advection))
    }

    /// Azimuths for every radius in `radii`, in order.
    pub fn calculate_p_many(&self, radii: &[Length]) -> Result<Vec<Angle>, SpiralError> {
        radii.iter().map(|r| self.calculate_p(*r)).collect()
    }

    pub fn curve(&self, radii: &[Length]) -> Result<Vec<CurvePoint>, SpiralError> {
        radii
            .iter()
            .map(|&r| Ok(CurvePoint { r, phi: self.calculate_p(r)? }))
            .collect()
    }
}

/// Footprint of the field line through `(r0, theta0, phi0)` carried by wind `vr`.
pub fn compute_footprint(
    r0: Length,
    theta0: Angle,
    phi0: Angle,
    vr: Velocity,
    b: Length,
) -> Result<Footprint, SpiralError> {
    let params = SpiralParameters::new(b)?;
    let spiral = ParkerSpiral::new(&StatePoint::new(r0, theta0, phi0, vr), &params)?;
    Ok(spiral.footprint())
}

/// Spiral azimuths at `radii` for the line anchored at `footprint`.
pub fn reconstruct(
    footprint: &Footprint,
    vr: Velocity,
    b: Length,
    radii: &[Length],
) -> Result<Vec<Angle>, SpiralError> {
    let params = SpiralParameters::new(b)?;
    ParkerSpiral::from_footprint(footprint, vr, &params)?.calculate_p_many(radii)
}

/// Spiral azimuths at `radii` for the line through `(r0, theta0, phi0)`.
pub fn trace_curve(
    r0: Length,
    theta0: Angle,
    phi0: Angle,
    vr: Velocity,
    b: Length,
    radii: &[Length],
) -> Result<Vec<Angle>, SpiralError> {
    let params = SpiralParameters::new(b)?;
    ParkerSpiral::new(&StatePoint::new(r0, theta0, phi0, vr), &params)?.calculate_p_many(radii)
}

/// `n` evenly spaced radii from `start` to `end` inclusive.
pub fn linspace(start: Length, end: Length, n: usize) -> Vec<Length> {
    let span = end - start;
    let mut grid = Vec::with_capacity(n);
    match n {
        0 => {}
        1 => grid.push(start),
        _ => {
            let last = (n - 1) as f64;
            for i in 0..n - 1 {
                grid.push(start + span * (i as f64 / last));
            }
            grid.push(end);
        }
    }
    grid
}

fn advection_constant(
    vr: Velocity,
    theta: Angle,
    params: &SpiralParameters,
) -> Result<f64, SpiralError> {
    let sin_theta = polar_sine(theta)?;
    let vr = vr.get::<meter_per_second>();
    if vr == 0.0 {
        return Err(DomainError::ZeroSpeed.into());
    }
    let w = params.angular_rate().get::<radian_per_second>();
    let b = params.reference_radius().get::<meter>();
    Ok(vr / (w * b * sin_theta))
}

fn polar_sine(theta: Angle) -> Result<f64, SpiralError> {
    let theta = theta.get::<radian>();
    let sin_theta = theta.sin();
    if sin_theta.abs() < POLE_TOLERANCE {
        return Err(DomainError::PoleSingularity(theta).into());
    }
    if theta < 0.0 || theta > PI {
        return Err(DomainError::PolarAngleOutOfRange(theta).into());
    }
    Ok(sin_theta)
}

fn radius_ratio(r: Length, b: Length) -> Result<f64, SpiralError> {
    let meters = r.get::<meter>();
    if meters <= 0.0 {
        return Err(DomainError::NonPositiveRadius(meters).into());
    }
    let rb: Ratio = r / b;
    Ok(rb.get::<ratio>())
}

/// `rb - 1 - ln(rb)`: zero at the reference sphere, positive elsewhere.
fn winding(rb: f64) -> Result<f64, SpiralError> {
    if rb <= 0.0 {
        return Err(DomainError::NonPositiveRatio(rb).into());
    }
    Ok(rb - 1.0 - rb.ln())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::length::{astronomical_unit, kilometer};
    use uom::si::time::day;
    use uom::si::velocity::kilometer_per_second;

    fn b() -> Length {
        solar_radii(10.0)
    }

    fn au(x: f64) -> Length {
        Length::new::<astronomical_unit>(x)
    }

    fn deg(x: f64) -> Angle {
        Angle::new::<degree>(x)
    }

    fn kms(x: f64) -> Velocity {
        Velocity::new::<kilometer_per_second>(x)
    }

    #[test]
    fn golden_one_au_equatorial_footprint() {
        let fp = compute_footprint(au(1.0), deg(90.0), deg(0.0), kms(400.0), b()).unwrap();
        let (theta, phi) = fp.degrees();
        assert!((theta - 90.0).abs() < 1e-12);
        assert!((phi - 46.323_794_848_755_6).abs() < 1e-9, "phib = {phi}");
    }

    #[test]
    fn spacecraft_on_reference_sphere_keeps_azimuth() {
        let phi0 = deg(37.5);
        let fp = compute_footprint(b(), deg(60.0), phi0, kms(650.0), b()).unwrap();
        assert_eq!(fp.phi(), phi0);
        assert_eq!(winding(radius_ratio(b(), b()).unwrap()).unwrap(), 0.0);
    }

    #[test]
    fn reconstruct_recovers_spacecraft_azimuth() {
        let r0 = au(0.97);
        let vr = kms(520.0);
        let fp = compute_footprint(r0, deg(83.0), deg(-12.0), vr, b()).unwrap();
        let phi = reconstruct(&fp, vr, b(), &[r0]).unwrap();
        assert_eq!(phi.len(), 1);
        assert!((phi[0].get::<degree>() - (-12.0)).abs() < 1e-9);
    }

    #[test]
    fn trace_curve_matches_reconstruction() {
        let r0 = au(1.0);
        let vr = kms(750.0);
        let grid = linspace(b(), au(1.1), 50);
        let traced = trace_curve(r0, deg(90.0), deg(45.0), vr, b(), &grid).unwrap();
        let fp = compute_footprint(r0, deg(90.0), deg(45.0), vr, b()).unwrap();
        let rebuilt = reconstruct(&fp, vr, b(), &grid).unwrap();
        assert_eq!(traced.len(), grid.len());
        for (a, c) in traced.iter().zip(&rebuilt) {
            assert!((a.get::<radian>() - c.get::<radian>()).abs() < 1e-12);
        }
        // first grid point is the footprint itself, azimuth falls off outward
        assert_eq!(traced[0], fp.phi());
        assert!(traced.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn faster_wind_winds_less() {
        let displacement = |speed: f64| {
            compute_footprint(au(1.0), deg(90.0), deg(0.0), kms(speed), b())
                .unwrap()
                .phi_deg()
        };
        let d: Vec<f64> = [300.0, 400.0, 600.0, 900.0].into_iter().map(displacement).collect();
        assert!(d.windows(2).all(|w| w[1] < w[0] && w[1] > 0.0));
        assert!((displacement(750.0) - 24.706_023_919_336_3).abs() < 1e-9);
    }

    #[test]
    fn negative_wind_winds_the_other_way() {
        let east = compute_footprint(au(1.0), deg(90.0), deg(0.0), kms(400.0), b()).unwrap();
        let west = compute_footprint(au(1.0), deg(90.0), deg(0.0), kms(-400.0), b()).unwrap();
        assert!((east.phi_deg() + west.phi_deg()).abs() < 1e-12);
    }

    #[test]
    fn poles_are_domain_errors() {
        for theta in [0.0, 180.0] {
            let err = compute_footprint(au(1.0), deg(theta), deg(0.0), kms(400.0), b()).unwrap_err();
            assert!(
                matches!(err, SpiralError::Domain(DomainError::PoleSingularity(_))),
                "theta = {theta}: {err}"
            );
        }
    }

    #[test]
    fn invalid_radii_and_speed_are_rejected() {
        let theta = deg(90.0);
        let phi = deg(0.0);
        let vr = kms(400.0);
        let km = Length::new::<kilometer>;
        assert!(matches!(
            compute_footprint(km(0.0), theta, phi, vr, b()),
            Err(SpiralError::Domain(DomainError::NonPositiveRadius(_)))
        ));
        assert!(matches!(
            compute_footprint(km(1.0e8), theta, phi, vr, km(-1.0)),
            Err(SpiralError::Domain(DomainError::NonPositiveReference(_)))
        ));
        assert!(matches!(
            compute_footprint(km(1.0e8), theta, phi, vr, km(f64::INFINITY)),
            Err(SpiralError::Domain(DomainError::NonPositiveReference(_)))
        ));
        assert!(matches!(
            compute_footprint(km(1.0e8), theta, phi, kms(0.0), b()),
            Err(SpiralError::Domain(DomainError::ZeroSpeed))
        ));
        assert!(matches!(
            compute_footprint(km(1.0e8), deg(-5.0), phi, vr, b()),
            Err(SpiralError::Domain(DomainError::PolarAngleOutOfRange(_)))
        ));
        let fp = Footprint::from_degrees(90.0, 10.0);
        assert!(reconstruct(&fp, vr, b(), &[b(), km(-3.0)]).is_err());
    }

    #[test]
    fn nan_input_yields_nan_footprint() {
        let fp = compute_footprint(au(1.0), deg(90.0), deg(0.0), kms(f64::NAN), b()).unwrap();
        assert!(fp.phi_deg().is_nan());
    }

    #[test]
    fn linspace_is_inclusive_and_ordered() {
        let grid = linspace(b(), au(1.1), 1000);
        assert_eq!(grid.len(), 1000);
        assert_eq!(grid[0], b());
        assert_eq!(grid[999], au(1.1));
        assert!(grid.windows(2).all(|w| w[1] > w[0]));
        assert!(linspace(b(), b(), 0).is_empty());
        assert_eq!(linspace(b(), au(1.0), 1), vec![b()]);
    }

    #[test]
    fn custom_rotation_period_scales_winding() {
        let slow = SpiralParameters::with_rotation_period(Time::new::<day>(54.550_522_4), b()).unwrap();
        let state = StatePoint::new(au(1.0), deg(90.0), deg(0.0), kms(400.0));
        let fast = ParkerSpiral::new(&state, &SpiralParameters::default()).unwrap();
        let slow = ParkerSpiral::new(&state, &slow).unwrap();
        let winding_ratio = fast.get_footprint().1 / slow.get_footprint().1;
        assert!((winding_ratio - 2.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_rotation_periods_are_rejected() {
        for days in [0.0, -27.0, f64::INFINITY, f64::NAN] {
            let err = SpiralParameters::with_rotation_period(Time::new::<day>(days), b()).unwrap_err();
            assert!(
                matches!(err, SpiralError::Domain(DomainError::NonPositivePeriod(_))),
                "period = {days} d: {err}"
            );
        }
        let params = SpiralParameters::new(b()).unwrap();
        assert!(params.angular_rate().get::<radian_per_second>().is_finite());
    }
}
