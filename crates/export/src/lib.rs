//! Export helpers for footprint series, spiral curves, and their metadata.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod footprints {
    use std::io::{self, Write};

    use solar_series::TimeSeriesRecord;

    const HEADER: &str = "epoch,lat_deg,lon_deg";

    /// Write the standard footprint CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// Write one row per epoch from the two-column field `field` of `record`.
    /// Missing samples are written as `NaN`.
    pub fn write_series(
        writer: &mut dyn Write,
        record: &TimeSeriesRecord,
        field: &str,
    ) -> io::Result<()> {
        let values = record
            .field(field)
            .filter(|f| f.values().columns() == 2)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("record '{}' has no two-column field '{field}'", record.label()),
                )
            })?
            .values();
        write_header(writer)?;
        for (index, epoch) in record.epoch().iter().enumerate() {
            let row = values.row(index).unwrap_or_default();
            writeln!(
                writer,
                "{},{:.6},{:.6}",
                epoch.to_rfc3339(),
                row.first().copied().unwrap_or(f64::NAN),
                row.get(1).copied().unwrap_or(f64::NAN),
            )?;
        }
        writer.flush()
    }
}

pub mod curve {
    use std::io::{self, Write};

    const HEADER: &str = "r_au,phi_deg,x_au,y_au";

    /// One sample of a spiral projected onto the x-y plane.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct CurveRow {
        pub r_au: f64,
        pub phi_deg: f64,
        pub x_au: f64,
        pub y_au: f64,
    }

    /// Write the standard curve CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    pub fn write_rows(writer: &mut dyn Write, rows: &[CurveRow]) -> io::Result<()> {
        write_header(writer)?;
        for row in rows {
            writeln!(
                writer,
                "{:.6},{:.6},{:.6},{:.6}",
                row.r_au, row.phi_deg, row.x_au, row.y_au
            )?;
        }
        writer.flush()
    }
}

pub mod metadata {
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use solar_series::{Field, TimeSeriesRecord};
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Description of one field in a JSON sidecar.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct FieldSummary {
        pub name: String,
        pub unit: String,
        pub legends: Vec<String>,
        pub description: Option<String>,
        pub samples: usize,
        pub missing: usize,
    }

    /// Description of a whole record.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct RecordSummary {
        pub spacecraft: String,
        pub first_epoch: Option<String>,
        pub last_epoch: Option<String>,
        pub samples: usize,
        pub fields: Vec<FieldSummary>,
    }

    impl From<&Field> for FieldSummary {
        fn from(field: &Field) -> Self {
            Self {
                name: field.name().to_string(),
                unit: field.unit().symbol().to_string(),
                legends: field.legends().to_vec(),
                description: field.meta().description.clone(),
                samples: field.len(),
                missing: field.nan_rows(),
            }
        }
    }

    impl From<&TimeSeriesRecord> for RecordSummary {
        fn from(record: &TimeSeriesRecord) -> Self {
            Self {
                spacecraft: record.label().to_string(),
                first_epoch: record.epoch().first().map(|t| t.to_rfc3339()),
                last_epoch: record.epoch().last().map(|t| t.to_rfc3339()),
                samples: record.len(),
                fields: record.fields().map(FieldSummary::from).collect(),
            }
        }
    }

    /// Write a pretty-printed JSON summary of `record` to `path`.
    pub fn write_sidecar(path: &Path, record: &TimeSeriesRecord) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(path)?, &RecordSummary::from(record))?;
        Ok(())
    }
}
