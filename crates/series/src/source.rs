//! Telemetry sources with an explicit open/fetch/close lifecycle.
//!
//! A source is handed to the pipeline by the caller; nothing in the workspace
//! keeps a process-wide client.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2, Ix1, Ix2, ShapeError};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::adapter::RawVariable;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("telemetry source is not open")]
    NotOpen,
    #[error("no telemetry available for spacecraft '{0}'")]
    MissingSpacecraft(String),
    #[error("failed to read telemetry: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse telemetry CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid epoch '{value}': {source}")]
    Epoch {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("inconsistent telemetry shape: {0}")]
    Shape(#[from] ShapeError),
}

/// Spacecraft and half-open time window `[start, end)` to retrieve.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRequest {
    pub spacecraft: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Raw, time-aligned telemetry for one spacecraft.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    pub spacecraft: String,
    pub epoch: Vec<DateTime<Utc>>,
    /// Cartesian HEEQ position, shape `(n, 3)`.
    pub position: RawVariable<Ix2>,
    /// Proton bulk (radial) speed, shape `(n,)`.
    pub speed: RawVariable<Ix1>,
}

impl TelemetryFrame {
    pub fn len(&self) -> usize {
        self.epoch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epoch.is_empty()
    }
}

pub trait TelemetrySource {
    fn open(&mut self) -> Result<(), SourceError>;
    fn fetch(&mut self, request: &TelemetryRequest) -> Result<TelemetryFrame, SourceError>;
    fn close(&mut self) -> Result<(), SourceError>;
    fn is_open(&self) -> bool;
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    epoch: String,
    x: f64,
    y: f64,
    z: f64,
    vp: f64,
}

/// Reads `<dir>/<spacecraft>.csv` files with columns `epoch,x,y,z,vp`.
///
/// Epochs are RFC 3339 timestamps. Units and fill value are properties of the
/// whole directory.
#[derive(Debug, Clone)]
pub struct CsvTelemetrySource {
    dir: PathBuf,
    position_unit: String,
    speed_unit: String,
    fill_value: f64,
    open: bool,
}

impl CsvTelemetrySource {
    pub fn new(
        dir: impl Into<PathBuf>,
        position_unit: impl Into<String>,
        speed_unit: impl Into<String>,
        fill_value: f64,
    ) -> Self {
        Self {
            dir: dir.into(),
            position_unit: position_unit.into(),
            speed_unit: speed_unit.into(),
            fill_value,
            open: false,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, spacecraft: &str) -> PathBuf {
        self.dir.join(format!("{spacecraft}.csv"))
    }
}

impl TelemetrySource for CsvTelemetrySource {
    fn open(&mut self) -> Result<(), SourceError> {
        if !self.dir.is_dir() {
            return Err(SourceError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("telemetry directory {} does not exist", self.dir.display()),
            )));
        }
        self.open = true;
        debug!(dir = %self.dir.display(), "opened CSV telemetry source");
        Ok(())
    }

    fn fetch(&mut self, request: &TelemetryRequest) -> Result<TelemetryFrame, SourceError> {
        if !self.open {
            return Err(SourceError::NotOpen);
        }
        let path = self.path_for(&request.spacecraft);
        if !path.is_file() {
            return Err(SourceError::MissingSpacecraft(request.spacecraft.clone()));
        }

        let mut reader = csv::Reader::from_reader(File::open(&path)?);
        let mut epoch = Vec::new();
        let mut position = Vec::new();
        let mut speed = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let t = DateTime::parse_from_rfc3339(row.epoch.trim())
                .map_err(|source| SourceError::Epoch {
                    value: row.epoch.clone(),
                    source,
                })?
                .with_timezone(&Utc);
            if t < request.start || t >= request.end {
                continue;
            }
            epoch.push(t);
            position.extend_from_slice(&[row.x, row.y, row.z]);
            speed.push(row.vp);
        }

        info!(
            spacecraft = %request.spacecraft,
            samples = epoch.len(),
            "fetched telemetry from {}",
            path.display()
        );

        let n = epoch.len();
        Ok(TelemetryFrame {
            spacecraft: request.spacecraft.clone(),
            epoch,
            position: RawVariable::new(
                Array2::from_shape_vec((n, 3), position)?,
                self.position_unit.clone(),
                self.fill_value,
            ),
            speed: RawVariable::new(Array1::from(speed), self.speed_unit.clone(), self.fill_value),
        })
    }

    fn close(&mut self) -> Result<(), SourceError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;

    fn request(spacecraft: &str) -> TelemetryRequest {
        TelemetryRequest {
            spacecraft: spacecraft.to_string(),
            start: Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2010, 1, 1, 0, 2, 0).unwrap(),
        }
    }

    fn write_csv(dir: &Path, name: &str, body: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        writeln!(file, "epoch,x,y,z,vp").unwrap();
        write!(file, "{body}").unwrap();
    }

    #[test]
    fn fetch_requires_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CsvTelemetrySource::new(dir.path(), "km", "km/s", -1e31);
        assert!(matches!(source.fetch(&request("A")), Err(SourceError::NotOpen)));
        source.open().unwrap();
        assert!(source.is_open());
        source.close().unwrap();
        assert!(matches!(source.fetch(&request("A")), Err(SourceError::NotOpen)));
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CsvTelemetrySource::new(dir.path().join("nope"), "km", "km/s", -1e31);
        assert!(matches!(source.open(), Err(SourceError::Io(_))));
    }

    #[test]
    fn reads_rows_inside_window() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "A.csv",
            "2010-01-01T00:00:00Z,1.0e8,2.0e7,0.0,400.0\n\
             2010-01-01T00:01:00Z,1.1e8,2.1e7,1.0,-1.0e31\n\
             2010-01-01T00:02:00Z,1.2e8,2.2e7,2.0,420.0\n",
        );
        let mut source = CsvTelemetrySource::new(dir.path(), "km", "km/sec", -1e31);
        source.open().unwrap();
        let frame = source.fetch(&request("A")).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.position.values.shape(), &[2, 3]);
        assert_eq!(frame.position.values[[1, 0]], 1.1e8);
        assert_eq!(frame.speed.values[1], -1.0e31);
        assert_eq!(frame.speed.units, "km/sec");
    }

    #[test]
    fn unknown_spacecraft_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CsvTelemetrySource::new(dir.path(), "km", "km/s", -1e31);
        source.open().unwrap();
        assert!(matches!(
            source.fetch(&request("B")),
            Err(SourceError::MissingSpacecraft(name)) if name == "B"
        ));
    }

    #[test]
    fn malformed_epoch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "A.csv", "yesterday,1.0,0.0,0.0,400.0\n");
        let mut source = CsvTelemetrySource::new(dir.path(), "km", "km/s", -1e31);
        source.open().unwrap();
        assert!(matches!(source.fetch(&request("A")), Err(SourceError::Epoch { .. })));
    }
}
