//! ## Typed Column Input
//!
//! [`ColumnData`] is the tagged input accepted by `fit` and `apply`. The type of a sample is
//! decided once, when the column is built, and checked at the operation boundary: asking a text or
//! boolean column for its numbers is a [`DiscretizerError::TypeMismatch`].
//!
//! Arrow arrays convert through [`ColumnData::from_arrow`]. Integer and floating-point arrays are
//! cast to `Float64`, and Arrow nulls become missing values.

use crate::exceptions::{DiscretizerError, DiscretizerResult};
use arrow::array::{Array, BooleanArray, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;

/// A single column of data, tagged with its element type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

/// Returns the value if it is present and not NaN.
#[inline]
pub(crate) fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| !v.is_nan())
}

impl ColumnData {
    /// A short name for the element type, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnData::Numeric(_) => "numeric",
            ColumnData::Text(_) => "text",
            ColumnData::Boolean(_) => "boolean",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the numeric values, or a `TypeMismatch` error for any other column type.
    pub fn as_numeric(&self) -> DiscretizerResult<&[Option<f64>]> {
        match self {
            ColumnData::Numeric(values) => Ok(values),
            other => Err(DiscretizerError::TypeMismatch {
                expected: "numeric".to_string(),
                found: other.kind().to_string(),
            }),
        }
    }

    /// Converts an Arrow array into a column.
    ///
    /// Integer, floating-point, and decimal arrays are cast to `Float64`.
    pub fn from_arrow(array: &dyn Array) -> DiscretizerResult<Self> {
        let data_type = array.data_type();
        if data_type.is_numeric() {
            let casted = cast(array, &DataType::Float64)?;
            let floats = downcast::<Float64Array>(casted.as_ref())?;
            return Ok(ColumnData::Numeric(floats.iter().collect()));
        }
        match data_type {
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
                let casted = cast(array, &DataType::Utf8)?;
                let strings = downcast::<StringArray>(casted.as_ref())?;
                Ok(ColumnData::Text(
                    strings.iter().map(|v| v.map(str::to_string)).collect(),
                ))
            }
            DataType::Boolean => {
                let booleans = downcast::<BooleanArray>(array)?;
                Ok(ColumnData::Boolean(booleans.iter().collect()))
            }
            dt => Err(DiscretizerError::TypeMismatch {
                expected: "numeric, text, or boolean Arrow array".to_string(),
                found: format!("{:?}", dt),
            }),
        }
    }
}

fn downcast<T: 'static>(array: &dyn Array) -> DiscretizerResult<&T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        DiscretizerError::TypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
            found: format!("{:?}", array.data_type()),
        }
    })
}

impl From<Vec<f64>> for ColumnData {
    fn from(values: Vec<f64>) -> Self {
        ColumnData::Numeric(values.into_iter().map(Some).collect())
    }
}

impl From<&[f64]> for ColumnData {
    fn from(values: &[f64]) -> Self {
        ColumnData::Numeric(values.iter().copied().map(Some).collect())
    }
}

impl From<Vec<Option<f64>>> for ColumnData {
    fn from(values: Vec<Option<f64>>) -> Self {
        ColumnData::Numeric(values)
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(values: Vec<i64>) -> Self {
        ColumnData::Numeric(values.into_iter().map(|v| Some(v as f64)).collect())
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(values: Vec<String>) -> Self {
        ColumnData::Text(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for ColumnData {
    fn from(values: Vec<&str>) -> Self {
        ColumnData::Text(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<Vec<bool>> for ColumnData {
    fn from(values: Vec<bool>) -> Self {
        ColumnData::Boolean(values.into_iter().map(Some).collect())
    }
}
