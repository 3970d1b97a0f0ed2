//! ## Applying a Fitted Discretizer
//!
//! [`apply`] maps numeric values to bins of a fitted [`Discretizer`]:
//!
//! - The first bin is closed on both ends, `[b0, b1]`; every other bin is `(b(i), b(i+1)]`.
//! - Values below the first or above the last breakpoint get no category. With unbounded ends
//!   this cannot happen for any number.
//! - Missing values (`None` or NaN) map to the missing category when the model keeps one, and
//!   stay missing otherwise.
//! - A model with no bins passes the input through unchanged.
//!
//! The categorical output always carries the full model domain, whichever labels actually occur.

use crate::column::{present, ColumnData};
use crate::exceptions::{DiscretizerError, DiscretizerResult};
use crate::model::Discretizer;
use arrow::array::{ArrayRef, DictionaryArray, Float64Array, Int32Array, StringArray};
use arrow::datatypes::Int32Type;
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::debug;

/// Categorical values with a fixed, ordered domain.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalColumn {
    domain: Vec<String>,
    codes: Vec<Option<usize>>,
}

impl CategoricalColumn {
    /// The admissible labels, in order.
    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Per-row index into the domain; `None` means no category.
    pub fn codes(&self) -> &[Option<usize>] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn get(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .copied()
            .flatten()
            .map(|code| self.domain[code].as_str())
    }

    /// Per-row labels.
    pub fn labels(&self) -> Vec<Option<&str>> {
        (0..self.len()).map(|row| self.get(row)).collect()
    }

    /// Converts to an Arrow dictionary array whose dictionary is exactly the domain.
    pub fn to_arrow(&self) -> DiscretizerResult<DictionaryArray<Int32Type>> {
        let keys = self
            .codes
            .iter()
            .map(|code| {
                code.map(|c| {
                    i32::try_from(c).map_err(|_| {
                        DiscretizerError::InvalidModel(format!("category index {} overflows", c))
                    })
                })
                .transpose()
            })
            .collect::<DiscretizerResult<Vec<Option<i32>>>>()?;
        let values: ArrayRef = Arc::new(StringArray::from(self.domain.clone()));
        Ok(DictionaryArray::try_new(Int32Array::from(keys), values)?)
    }
}

/// The result of applying a discretizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Binned {
    /// The model has no bins; values are returned unchanged.
    Passthrough(Vec<Option<f64>>),
    Categorical(CategoricalColumn),
}

impl Binned {
    pub fn as_categorical(&self) -> Option<&CategoricalColumn> {
        match self {
            Binned::Categorical(column) => Some(column),
            Binned::Passthrough(_) => None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Binned::Passthrough(_))
    }

    /// Converts to an Arrow array: `Float64` for pass-through, dictionary-encoded otherwise.
    pub fn to_arrow(&self) -> DiscretizerResult<ArrayRef> {
        let array: ArrayRef = match self {
            Binned::Passthrough(values) => Arc::new(Float64Array::from(values.clone())),
            Binned::Categorical(column) => Arc::new(column.to_arrow()?),
        };
        Ok(array)
    }
}

/// Index of the bin containing `value`, or `None` if it lies outside the breakpoints.
///
/// `breakpoints` must be strictly increasing with at least two entries.
pub fn bin_index(breakpoints: &[f64], value: f64) -> Option<usize> {
    let (first, last) = (*breakpoints.first()?, *breakpoints.last()?);
    if value.is_nan() || value < first || value > last {
        return None;
    }
    if value == first {
        return Some(0);
    }
    // First breakpoint not below `value`; `value` lies in (b[idx - 1], b[idx]].
    let idx = breakpoints.partition_point(|b| *b < value);
    Some(idx - 1)
}

/// Applies a fitted discretizer to `values`.
///
/// # Errors
///
/// * `InvalidModel` if the model breaks its invariants.
/// * `TypeMismatch` if `values` is not numeric.
pub fn apply(model: &Discretizer, values: &ColumnData) -> DiscretizerResult<Binned> {
    model.validate()?;
    let values = values.as_numeric()?;
    if model.is_degenerate() {
        debug!("Discretizer has no bins; passing {} values through", values.len());
        return Ok(Binned::Passthrough(values.to_vec()));
    }

    let offset = usize::from(model.keep_missing());
    let breakpoints = model.breakpoints();
    let codes = values
        .iter()
        .map(|value| match present(*value) {
            Some(v) => bin_index(breakpoints, v).map(|bin| bin + offset),
            None => model.missing_index(),
        })
        .collect();
    Ok(Binned::Categorical(CategoricalColumn {
        domain: model.display_labels(),
        codes,
    }))
}

/// Applies a fitted discretizer to a single-column record batch.
///
/// Batches with more than one column are rejected rather than silently reduced to their
/// first column.
pub fn apply_batch(model: &Discretizer, batch: &RecordBatch) -> DiscretizerResult<Binned> {
    if batch.num_columns() != 1 {
        return Err(DiscretizerError::InvalidParameter(format!(
            "expected a single-column batch, got {} columns",
            batch.num_columns()
        )));
    }
    let column = ColumnData::from_arrow(batch.column(0).as_ref())?;
    apply(model, &column)
}
