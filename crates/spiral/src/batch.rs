//! Footprints for whole telemetry series.
//!
//! Samples are independent: row `i` of the output depends only on row `i` of
//! the inputs. A sample with any NaN input produces a NaN row, since NaN marks
//! data the source could not deliver. A sample the model cannot trace (zero
//! speed, a position on the rotation axis or at the origin) also yields a NaN
//! row and is counted in the log; it never fails the series.

use ndarray::Array2;
use solar_core::spherical::Spherical;
use solar_core::units::in_solar_radii;
use solar_series::unit::{DEGREE, Dimension};
use solar_series::{Field, FieldValues};
use tracing::{debug, warn};
use uom::si::angle::radian;
use uom::si::f64::{Angle, Length, Velocity};
use uom::si::length::meter;
use uom::si::velocity::meter_per_second;

use crate::SpiralError;
use crate::model::{ParkerSpiral, SpiralParameters, StatePoint};

/// Name of the footprint field in a record.
pub const FOOTPRINT_FIELD: &str = "footprint";
/// Column labels of the footprint field.
pub const FOOTPRINT_LEGENDS: [&str; 2] = ["lat(HEEQ)", "lon(HEEQ)"];

/// Footprint latitude and longitude (degrees) for every sample.
///
/// `positions` must be an `(N, 3)` Cartesian length field and `speeds` an
/// `N`-long velocity field. Column 0 of the result is the latitude
/// `90° - theta`, column 1 the footprint azimuth `phib`.
pub fn compute_footprint_batch(
    positions: &Field,
    speeds: &Field,
    params: &SpiralParameters,
) -> Result<Field, SpiralError> {
    let position_values = match positions.values() {
        FieldValues::Columns(values) if values.ncols() == 3 => values,
        other => {
            return Err(SpiralError::Columns {
                field: positions.name().to_string(),
                expected: 3,
                found: other.columns(),
            });
        }
    };
    let speed_values = match speeds.values() {
        FieldValues::Scalar(values) => values,
        other => {
            return Err(SpiralError::Columns {
                field: speeds.name().to_string(),
                expected: 1,
                found: other.columns(),
            });
        }
    };
    if position_values.nrows() != speed_values.len() {
        return Err(SpiralError::ShapeMismatch {
            positions: position_values.nrows(),
            speeds: speed_values.len(),
        });
    }

    let to_meters = positions.unit().si_factor(Dimension::Length, "trace positions in")?;
    let to_meters_per_second = speeds.unit().si_factor(Dimension::Velocity, "trace speeds in")?;

    let mut out = Array2::from_elem((speed_values.len(), 2), f64::NAN);
    let mut degenerate = 0usize;
    for (index, ((position, &speed), mut row)) in position_values
        .rows()
        .into_iter()
        .zip(speed_values.iter())
        .zip(out.rows_mut())
        .enumerate()
    {
        if speed.is_nan() || position.iter().any(|v| v.is_nan()) {
            continue;
        }
        let s = Spherical::from_cartesian(&[
            position[0] * to_meters,
            position[1] * to_meters,
            position[2] * to_meters,
        ]);
        let state = StatePoint::new(
            Length::new::<meter>(s.r),
            Angle::new::<radian>(s.theta),
            Angle::new::<radian>(s.phi),
            Velocity::new::<meter_per_second>(speed * to_meters_per_second),
        );
        match ParkerSpiral::new(&state, params) {
            Ok(spiral) => {
                let footprint = spiral.footprint();
                row[0] = footprint.latitude_deg();
                row[1] = footprint.phi_deg();
            }
            Err(SpiralError::Domain(err)) => {
                degenerate += 1;
                debug!(index, "no footprint for sample: {err}");
            }
            Err(err) => return Err(err),
        }
    }

    let field = Field::columns(FOOTPRINT_FIELD, DEGREE, FOOTPRINT_LEGENDS, out)?;
    if degenerate > 0 {
        warn!(degenerate, "samples could not be traced and were left as NaN");
    }
    debug!(
        samples = field.len(),
        missing = field.nan_rows(),
        degenerate,
        "computed footprint series"
    );
    let b_rsun = in_solar_radii(params.reference_radius());
    Ok(field.with_description(format!("Parker spiral footprint at b = {b_rsun:.1} R_sun")))
}
