//! Time-ordered records of unit-tagged fields, plus the input layer that turns raw
//! spacecraft telemetry into them.

pub mod adapter;
pub mod record;
pub mod resample;
pub mod source;
pub mod unit;

pub use adapter::{Processed, RawVariable, parse_unit};
pub use record::{Field, FieldMeta, FieldValues, SeriesError, TimeSeriesRecord};
pub use source::{CsvTelemetrySource, SourceError, TelemetryFrame, TelemetryRequest, TelemetrySource};
pub use unit::{Dimension, DimensionError, Unit};
