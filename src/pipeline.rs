//! Multi-spacecraft footprint pipeline.
//!
//! Telemetry comes from a caller-supplied [`TelemetrySource`]; every spacecraft
//! in the configuration becomes one [`TimeSeriesRecord`] holding its position,
//! wind speed and footprint series.

use chrono::{DateTime, Utc};
use solar_config::{ConfigError, PipelineConfig, SpiralGridConfig};
use solar_core::units::solar_radii;
use solar_export::curve::CurveRow;
use solar_series::resample;
use solar_series::{
    Field, FieldValues, SeriesError, SourceError, TelemetryFrame, TelemetryRequest,
    TelemetrySource, TimeSeriesRecord, Unit,
};
use solar_spiral::{
    FOOTPRINT_FIELD, Footprint, ParkerSpiral, SpiralError, SpiralParameters,
    compute_footprint_batch, linspace,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uom::si::angle::{degree, radian};
use uom::si::f64::{Length, Velocity};
use uom::si::length::astronomical_unit;

/// Cartesian HEEQ position field.
pub const POSITION_FIELD: &str = "HEEQ";
/// Proton bulk speed field.
pub const SPEED_FIELD: &str = "Vp";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error(transparent)]
    Spiral(#[from] SpiralError),
    #[error("no spacecraft data could be loaded")]
    NoData,
    #[error("record '{record}' has no usable field '{field}'")]
    MissingField { record: String, field: &'static str },
}

/// Footprint records of several spacecraft traced onto one sphere.
#[derive(Debug, Clone)]
pub struct SpacecraftData {
    params: SpiralParameters,
    records: Vec<TimeSeriesRecord>,
}

/// A spiral drawn from one spacecraft's footprint at one instant.
#[derive(Debug, Clone)]
pub struct SpiralSnapshot {
    pub spacecraft: String,
    pub epoch: DateTime<Utc>,
    pub footprint: Footprint,
    pub speed: Velocity,
    /// Spacecraft position in AU.
    pub position_au: [f64; 3],
    pub curve: Vec<CurveRow>,
}

impl SpacecraftData {
    /// Fetch, adapt and trace every configured spacecraft.
    ///
    /// The source is opened if needed and closed again if this call opened it.
    /// A spacecraft whose telemetry cannot be fetched or adapted is skipped
    /// with a warning. Samples that cannot be traced stay in the record as NaN
    /// footprints.
    pub fn load<S>(source: &mut S, config: &PipelineConfig) -> Result<Self, PipelineError>
    where
        S: TelemetrySource + ?Sized,
    {
        config.validate()?;
        let params = SpiralParameters::new(solar_radii(config.reference_radius_solar_radii))?;

        let opened_here = !source.is_open();
        if opened_here {
            source.open()?;
        }
        let records = fetch_all(source, config, &params);
        if opened_here {
            source.close()?;
        }

        if records.is_empty() {
            return Err(PipelineError::NoData);
        }
        Ok(Self { params, records })
    }

    pub fn from_records(params: SpiralParameters, records: Vec<TimeSeriesRecord>) -> Self {
        Self { params, records }
    }

    pub fn params(&self) -> &SpiralParameters {
        &self.params
    }

    pub fn records(&self) -> &[TimeSeriesRecord] {
        &self.records
    }

    pub fn record(&self, spacecraft: &str) -> Option<&TimeSeriesRecord> {
        self.records.iter().find(|r| r.label() == spacecraft)
    }

    /// Spirals of every spacecraft at the sample nearest to `at`.
    ///
    /// Spacecraft with no samples, or a missing footprint at that sample, are
    /// left out.
    pub fn spiral_snapshot(
        &self,
        at: DateTime<Utc>,
        grid: &SpiralGridConfig,
    ) -> Result<Vec<SpiralSnapshot>, PipelineError> {
        let radii = linspace(
            self.params.reference_radius(),
            Length::new::<astronomical_unit>(grid.outer_radius_au),
            grid.samples,
        );
        let mut snapshots = Vec::new();
        for record in &self.records {
            let Some(index) = nearest_index(record.epoch(), at) else {
                continue;
            };
            let footprint_row = row_of(record, FOOTPRINT_FIELD, index)?;
            let position_row = row_of(record, POSITION_FIELD, index)?;
            let speed_row = row_of(record, SPEED_FIELD, index)?;
            if footprint_row.iter().chain(&speed_row).any(|v| v.is_nan()) {
                debug!(spacecraft = record.label(), index, "no footprint at snapshot time");
                continue;
            }

            let footprint = Footprint::from_degrees(90.0 - footprint_row[0], footprint_row[1]);
            let speed = record_unit(record, SPEED_FIELD)?
                .velocity(speed_row[0])
                .map_err(SeriesError::from)?;
            let spiral = ParkerSpiral::from_footprint(&footprint, speed, &self.params)?;
            let curve = curve_rows(&spiral, &radii)?;

            let to_au = record_unit(record, POSITION_FIELD)?
                .length(1.0)
                .map_err(SeriesError::from)?
                .get::<astronomical_unit>();
            snapshots.push(SpiralSnapshot {
                spacecraft: record.label().to_string(),
                epoch: record.epoch()[index],
                footprint,
                speed,
                position_au: [
                    position_row[0] * to_au,
                    position_row[1] * to_au,
                    position_row[2] * to_au,
                ],
                curve,
            });
        }
        Ok(snapshots)
    }
}

/// Sample `spiral` at `radii` and project it onto the x-y plane in AU.
pub fn curve_rows(spiral: &ParkerSpiral, radii: &[Length]) -> Result<Vec<CurveRow>, SpiralError> {
    let sin_theta = spiral.footprint().theta().get::<radian>().sin();
    Ok(spiral
        .curve(radii)?
        .into_iter()
        .map(|point| {
            let r_au = point.r.get::<astronomical_unit>();
            let phi = point.phi.get::<radian>();
            CurveRow {
                r_au,
                phi_deg: point.phi.get::<degree>(),
                x_au: r_au * sin_theta * phi.cos(),
                y_au: r_au * sin_theta * phi.sin(),
            }
        })
        .collect())
}

fn fetch_all<S>(
    source: &mut S,
    config: &PipelineConfig,
    params: &SpiralParameters,
) -> Vec<TimeSeriesRecord>
where
    S: TelemetrySource + ?Sized,
{
    let mut records = Vec::new();
    for spacecraft in &config.spacecraft {
        let request = TelemetryRequest {
            spacecraft: spacecraft.clone(),
            start: config.start,
            end: config.end,
        };
        let frame = match source.fetch(&request) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(spacecraft = %spacecraft, "failed retrieving data: {err}");
                continue;
            }
        };
        match build_record(frame, config.downsample, params) {
            Ok(record) => records.push(record),
            Err(err) => warn!(spacecraft = %spacecraft, "skipping unusable telemetry: {err}"),
        }
    }
    records
}

/// Turn one raw frame into a record with position, speed and footprint fields.
pub fn build_record(
    frame: TelemetryFrame,
    downsample: Option<usize>,
    params: &SpiralParameters,
) -> Result<TimeSeriesRecord, PipelineError> {
    let stride = resample::stride_for(frame.len(), downsample);
    let epoch = resample::downsample(&frame.epoch, stride);
    let position = frame.position.process(stride)?;
    let speed = frame.speed.process(stride)?;

    let positions = Field::columns(POSITION_FIELD, position.unit, ["X", "Y", "Z"], position.values)?
        .with_description("Spacecraft position (HEEQ)");
    let speeds = Field::scalar(SPEED_FIELD, speed.unit, speed.values)
        .with_description("Proton bulk speed");
    let footprint = compute_footprint_batch(&positions, &speeds, params)?;

    info!(
        spacecraft = %frame.spacecraft,
        samples = epoch.len(),
        stride,
        missing = footprint.nan_rows(),
        "traced footprints"
    );

    Ok(TimeSeriesRecord::new(frame.spacecraft, epoch)
        .with_field(positions)?
        .with_field(speeds)?
        .with_field(footprint)?)
}

/// Index of the epoch closest to `at`; ties go to the earlier sample.
pub fn nearest_index(epochs: &[DateTime<Utc>], at: DateTime<Utc>) -> Option<usize> {
    epochs
        .iter()
        .enumerate()
        .min_by_key(|(_, t)| (**t - at).abs())
        .map(|(index, _)| index)
}

fn row_of(
    record: &TimeSeriesRecord,
    field: &'static str,
    index: usize,
) -> Result<Vec<f64>, PipelineError> {
    record
        .field(field)
        .map(Field::values)
        .and_then(|values: &FieldValues| values.row(index))
        .ok_or_else(|| PipelineError::MissingField {
            record: record.label().to_string(),
            field,
        })
}

fn record_unit(
    record: &TimeSeriesRecord,
    field: &'static str,
) -> Result<Unit, PipelineError> {
    record
        .field(field)
        .map(Field::unit)
        .ok_or_else(|| PipelineError::MissingField {
            record: record.label().to_string(),
            field,
        })
}
