//! Input adaptation: fill values become NaN, unit strings become [`Unit`]s.
//!
//! String unit parsing lives here and nowhere else; everything past this layer
//! works with typed units.

use ndarray::{Array, Dimension};
use crate::unit::{
    ASTRONOMICAL_UNIT, DAY, DEGREE, DIMENSIONLESS, KILOMETER, KILOMETER_PER_SECOND, METER,
    METER_PER_SECOND, RADIAN, RADIAN_PER_SECOND, SECOND, SOLAR_RADIUS, Unit,
};

use crate::record::SeriesError;
use crate::resample;

/// A telemetry variable as delivered by a source: raw numbers, the unit string
/// of the source, and the sentinel it uses for missing samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVariable<D: Dimension> {
    pub values: Array<f64, D>,
    pub units: String,
    pub fill_value: f64,
}

/// A variable after fill masking, unit parsing and resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct Processed<D: Dimension> {
    pub values: Array<f64, D>,
    pub unit: Unit,
}

impl<D: Dimension> RawVariable<D> {
    pub fn new(values: Array<f64, D>, units: impl Into<String>, fill_value: f64) -> Self {
        Self {
            values,
            units: units.into(),
            fill_value,
        }
    }

    /// Mask fill values, resolve the unit and keep every `stride`-th sample.
    pub fn process(self, stride: usize) -> Result<Processed<D>, SeriesError> {
        let unit = parse_unit(&self.units)?;
        let fill = self.fill_value;
        let mut values = resample::downsample_rows(&self.values, stride);
        values.mapv_inplace(|v| if v == fill { f64::NAN } else { v });
        Ok(Processed { values, unit })
    }
}

/// Resolve a telemetry unit string. `sec` is accepted for `s`, and `Na`
/// (not applicable) or an empty string mean dimensionless.
pub fn parse_unit(raw: &str) -> Result<Unit, SeriesError> {
    let normalized = raw.trim().replace("sec", "s");
    let unit = match normalized.as_str() {
        "" | "Na" => DIMENSIONLESS,
        "m" => METER,
        "km" => KILOMETER,
        "AU" | "au" => ASTRONOMICAL_UNIT,
        "R_sun" | "Rsun" | "solRad" => SOLAR_RADIUS,
        "s" => SECOND,
        "day" | "d" => DAY,
        "rad" => RADIAN,
        "deg" | "degrees" => DEGREE,
        "m/s" => METER_PER_SECOND,
        "km/s" => KILOMETER_PER_SECOND,
        "rad/s" => RADIAN_PER_SECOND,
        _ => return Err(SeriesError::UnknownUnit(raw.to_string())),
    };
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn parses_telemetry_unit_strings() {
        assert_eq!(parse_unit("km/sec").unwrap(), KILOMETER_PER_SECOND);
        assert_eq!(parse_unit(" km ").unwrap(), KILOMETER);
        assert_eq!(parse_unit("Na").unwrap(), DIMENSIONLESS);
        assert_eq!(parse_unit("AU").unwrap(), ASTRONOMICAL_UNIT);
        assert!(matches!(parse_unit("nT"), Err(SeriesError::UnknownUnit(u)) if u == "nT"));
    }

    #[test]
    fn fill_values_become_nan() {
        let raw = RawVariable::new(array![400.0, -1.0e31, 420.0], "km/sec", -1.0e31);
        let processed = raw.process(1).unwrap();
        assert_eq!(processed.unit, KILOMETER_PER_SECOND);
        assert_eq!(processed.values[0], 400.0);
        assert!(processed.values[1].is_nan());
        assert_eq!(processed.values[2], 420.0);
    }

    #[test]
    fn rows_are_strided_before_masking() {
        let raw = RawVariable::new(
            array![[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [-1.0, -1.0, -1.0], [4.0, 0.0, 0.0]],
            "km",
            -1.0,
        );
        let processed = raw.process(2).unwrap();
        assert_eq!(processed.values.nrows(), 2);
        assert_eq!(processed.values[[0, 0]], 1.0);
        assert!(processed.values.row(1).iter().all(|v| v.is_nan()));
    }
}
