use std::path::PathBuf;

use clap::Parser;
use parker_footprint::export::{curve, writer_for_path};
use parker_footprint::pipeline::curve_rows;
use parker_footprint::spiral::{ParkerSpiral, SpiralParameters, StatePoint, linspace};
use parker_footprint::units::solar_radii;
use tracing_subscriber::EnvFilter;
use uom::si::angle::degree;
use uom::si::f64::{Angle, Length, Velocity};
use uom::si::length::astronomical_unit;
use uom::si::velocity::kilometer_per_second;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Footprint and spiral curve of a single solar-wind observation"
)]
struct Cli {
    /// Heliocentric distance of the observation in AU
    #[arg(long)]
    r_au: f64,

    /// Colatitude in degrees (90 is the equator)
    #[arg(long, default_value_t = 90.0)]
    theta_deg: f64,

    /// Azimuth in degrees
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    phi_deg: f64,

    /// Radial wind speed in km/s
    #[arg(long, allow_negative_numbers = true)]
    vr_km_s: f64,

    /// Reference (source surface) radius in solar radii
    #[arg(long, default_value_t = 10.0)]
    b_rsun: f64,

    /// Outer radius of the traced curve in AU
    #[arg(long, default_value_t = 1.1)]
    outer_au: f64,

    /// Number of curve samples between the reference sphere and the outer radius
    #[arg(long, default_value_t = 100)]
    samples: usize,

    /// Write the curve as CSV to this path (`-` for stdout)
    #[arg(long)]
    curve: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
    let cli = Cli::parse();

    let params = SpiralParameters::new(solar_radii(cli.b_rsun))?;
    let state = StatePoint::new(
        Length::new::<astronomical_unit>(cli.r_au),
        Angle::new::<degree>(cli.theta_deg),
        Angle::new::<degree>(cli.phi_deg),
        Velocity::new::<kilometer_per_second>(cli.vr_km_s),
    );
    let spiral = ParkerSpiral::new(&state, &params)?;
    let footprint = spiral.footprint();
    println!(
        "footprint: theta = {:.6} deg, phi = {:.6} deg (lat {:.6} deg)",
        footprint.theta_deg(),
        footprint.phi_deg(),
        footprint.latitude_deg()
    );

    if let Some(path) = cli.curve {
        let radii = linspace(
            params.reference_radius(),
            Length::new::<astronomical_unit>(cli.outer_au),
            cli.samples,
        );
        let rows = curve_rows(&spiral, &radii)?;
        let mut writer = writer_for_path(&path)?;
        curve::write_rows(writer.as_mut(), &rows)?;
    }
    Ok(())
}
