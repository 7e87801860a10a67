//! Named, unit-tagged fields sharing one epoch axis.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use crate::unit::{DimensionError, Unit};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("field '{field}' has {found} samples but the series has {expected}")]
    ShapeMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    #[error("field '{field}' has {columns} columns but {legends} legend labels")]
    LegendMismatch {
        field: String,
        columns: usize,
        legends: usize,
    },
    #[error("field '{0}' is already present in the record")]
    DuplicateField(String),
    #[error("unrecognised unit '{0}'")]
    UnknownUnit(String),
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

/// Descriptive metadata attached to every field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMeta {
    pub name: String,
    pub unit: Unit,
    /// Per-column labels for multi-column fields, empty for scalar fields.
    pub legends: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValues {
    Scalar(Array1<f64>),
    /// Row-per-sample matrix of shape `(len, columns)`.
    Columns(Array2<f64>),
}

impl FieldValues {
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Scalar(values) => values.len(),
            FieldValues::Columns(values) => values.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> usize {
        match self {
            FieldValues::Scalar(_) => 1,
            FieldValues::Columns(values) => values.ncols(),
        }
    }

    /// One column as a view; column 0 of a scalar field is the field itself.
    pub fn column(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        match self {
            FieldValues::Scalar(values) if index == 0 => Some(values.view()),
            FieldValues::Scalar(_) => None,
            FieldValues::Columns(values) if index < values.ncols() => {
                Some(values.index_axis(Axis(1), index))
            }
            FieldValues::Columns(_) => None,
        }
    }

    /// Values of sample `index`, one per column.
    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        if index >= self.len() {
            return None;
        }
        match self {
            FieldValues::Scalar(values) => Some(vec![values[index]]),
            FieldValues::Columns(values) => Some(values.row(index).to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    meta: FieldMeta,
    values: FieldValues,
}

impl Field {
    pub fn scalar(name: impl Into<String>, unit: Unit, values: Array1<f64>) -> Self {
        Self {
            meta: FieldMeta {
                name: name.into(),
                unit,
                legends: Vec::new(),
                description: None,
            },
            values: FieldValues::Scalar(values),
        }
    }

    /// Multi-column field; `legends` is either empty or one label per column.
    pub fn columns<S: Into<String>>(
        name: impl Into<String>,
        unit: Unit,
        legends: impl IntoIterator<Item = S>,
        values: Array2<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();
        let legends: Vec<String> = legends.into_iter().map(Into::into).collect();
        if !legends.is_empty() && legends.len() != values.ncols() {
            return Err(SeriesError::LegendMismatch {
                field: name,
                columns: values.ncols(),
                legends: legends.len(),
            });
        }
        Ok(Self {
            meta: FieldMeta {
                name,
                unit,
                legends,
                description: None,
            },
            values: FieldValues::Columns(values),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn unit(&self) -> Unit {
        self.meta.unit
    }

    pub fn legends(&self) -> &[String] {
        &self.meta.legends
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of samples with at least one NaN component.
    pub fn nan_rows(&self) -> usize {
        match &self.values {
            FieldValues::Scalar(values) => values.iter().filter(|v| v.is_nan()).count(),
            FieldValues::Columns(values) => values
                .rows()
                .into_iter()
                .filter(|row| row.iter().any(|v| v.is_nan()))
                .count(),
        }
    }
}

/// Parallel fields of one spacecraft, indexed by a shared epoch axis.
///
/// Fields are attached while the record is assembled; a finished record only
/// hands out shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRecord {
    label: String,
    epoch: Vec<DateTime<Utc>>,
    fields: BTreeMap<String, Field>,
}

impl TimeSeriesRecord {
    pub fn new(label: impl Into<String>, epoch: Vec<DateTime<Utc>>) -> Self {
        Self {
            label: label.into(),
            epoch,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Result<Self, SeriesError> {
        if field.len() != self.epoch.len() {
            return Err(SeriesError::ShapeMismatch {
                field: field.name().to_string(),
                expected: self.epoch.len(),
                found: field.len(),
            });
        }
        if self.fields.contains_key(field.name()) {
            return Err(SeriesError::DuplicateField(field.name().to_string()));
        }
        self.fields.insert(field.name().to_string(), field);
        Ok(self)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn epoch(&self) -> &[DateTime<Utc>] {
        &self.epoch
    }

    pub fn len(&self) -> usize {
        self.epoch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epoch.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::array;
    use crate::unit::{DEGREE, KILOMETER_PER_SECOND};

    fn epochs(n: usize) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|i| Utc.timestamp_opt(1_262_304_000 + 60 * i as i64, 0).unwrap())
            .collect()
    }

    #[test]
    fn rejects_field_of_wrong_length() {
        let record = TimeSeriesRecord::new("sta", epochs(3));
        let err = record
            .with_field(Field::scalar("Vp", KILOMETER_PER_SECOND, array![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            SeriesError::ShapeMismatch { expected: 3, found: 2, .. }
        ));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let record = TimeSeriesRecord::new("sta", epochs(2))
            .with_field(Field::scalar("Vp", KILOMETER_PER_SECOND, array![1.0, 2.0]))
            .unwrap();
        let err = record
            .with_field(Field::scalar("Vp", KILOMETER_PER_SECOND, array![3.0, 4.0]))
            .unwrap_err();
        assert!(matches!(err, SeriesError::DuplicateField(name) if name == "Vp"));
    }

    #[test]
    fn legends_must_match_columns() {
        let values = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(Field::columns("fp", DEGREE, ["lat"], values.clone()).is_err());
        let field = Field::columns("fp", DEGREE, ["lat", "lon"], values).unwrap();
        assert_eq!(field.legends(), ["lat".to_string(), "lon".to_string()]);
        assert_eq!(field.values().column(1).unwrap().to_vec(), vec![2.0, 4.0]);
        assert_eq!(field.values().row(1), Some(vec![3.0, 4.0]));
        assert!(field.values().column(2).is_none());
    }

    #[test]
    fn counts_nan_rows() {
        let field = Field::columns(
            "fp",
            DEGREE,
            Vec::<String>::new(),
            array![[1.0, f64::NAN], [3.0, 4.0], [f64::NAN, f64::NAN]],
        )
        .unwrap();
        assert_eq!(field.nan_rows(), 2);
    }
}
