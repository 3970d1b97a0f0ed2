//! ## Quantile Discretization of DataFrame Columns
//!
//! [`QuantileDiscretizer`] fits one [`Discretizer`] per target column of a DataFusion DataFrame
//! and replaces those columns with their bin labels.
//!
//! `fit` collects the target columns and fits them in parallel. `transform` is lazy: each target
//! column becomes a CASE expression encoding the same rules as [`crate::apply::apply`]
//! (first bin closed on both ends, the rest closed on the right, out-of-range values NULL,
//! missing values mapped to the missing category when it is kept). Columns whose model has no
//! bins are left untouched.
//!
//! As in the core, SQL NULL and NaN both count as missing.
//!
//! The transformed columns are plain `Utf8`. Their fixed, ordered domain is the one of the fitted
//! model, available through [`QuantileDiscretizer::domain`].

use crate::column::ColumnData;
use crate::config::DiscretizeConfig;
use crate::exceptions::{DiscretizerError, DiscretizerResult};
use crate::fit::fit;
use crate::impl_transformer;
use crate::model::Discretizer;
use datafusion::dataframe::DataFrame;
use datafusion::functions::math::expr_fn::isnan;
use datafusion::logical_expr::{col, lit, Case as DFCase, Expr};
use datafusion::scalar::ScalarValue;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Validates that a column exists and is numeric.
fn validate_numeric_column(df: &DataFrame, col_name: &str) -> DiscretizerResult<()> {
    let field = df.schema().field_with_name(None, col_name).map_err(|_| {
        DiscretizerError::MissingColumn(format!("Column '{}' not found", col_name))
    })?;
    if field.data_type().is_numeric() {
        Ok(())
    } else {
        Err(DiscretizerError::TypeMismatch {
            expected: format!("numeric column '{}'", col_name),
            found: format!("{:?}", field.data_type()),
        })
    }
}

/// Collects every value of a numeric column.
async fn collect_numeric_column(
    df: &DataFrame,
    col_name: &str,
) -> DiscretizerResult<Vec<Option<f64>>> {
    let batches = df.clone().select(vec![col(col_name)])?.collect().await?;
    let mut values = Vec::new();
    for batch in batches {
        match ColumnData::from_arrow(batch.column(0).as_ref())? {
            ColumnData::Numeric(chunk) => values.extend(chunk),
            other => {
                return Err(DiscretizerError::TypeMismatch {
                    expected: format!("numeric column '{}'", col_name),
                    found: other.kind().to_string(),
                })
            }
        }
    }
    Ok(values)
}

/// Builds the CASE expression that maps a column onto the bins of `model`.
///
/// For breakpoints `b0 < b1 < ... < bn` and display labels `l1 ... ln` it generates:
/// `WHEN col >= b0 AND col <= b1 THEN l1`, then `WHEN col > b(i-1) AND col <= b(i) THEN l(i)`.
/// With a missing category, `WHEN col IS NULL THEN <prefix>_missing` comes first
/// (`OR isnan(col)` for floating-point columns).
/// If none match, returns NULL.
fn build_bin_case_expr(col_name: &str, model: &Discretizer, is_floating: bool) -> Expr {
    let display = model.display_labels();
    let offset = usize::from(model.keep_missing());
    let mut when_then_expr = Vec::with_capacity(display.len());
    if let Some(missing) = model.missing_index() {
        let is_missing = if is_floating {
            col(col_name).is_null().or(isnan(col(col_name)))
        } else {
            col(col_name).is_null()
        };
        when_then_expr.push((
            Box::new(is_missing),
            Box::new(lit(display[missing].clone())),
        ));
    }
    for (i, pair) in model.breakpoints().windows(2).enumerate() {
        let (lower, upper) = (pair[0], pair[1]);
        let above_lower = if i == 0 {
            col(col_name).gt_eq(lit(lower))
        } else {
            col(col_name).gt(lit(lower))
        };
        let condition = above_lower.and(col(col_name).lt_eq(lit(upper)));
        when_then_expr.push((
            Box::new(condition),
            Box::new(lit(display[i + offset].clone())),
        ));
    }
    Expr::Case(DFCase {
        expr: None,
        when_then_expr,
        else_expr: Some(Box::new(lit(ScalarValue::Utf8(None)))),
    })
}

/// Replaces each target column that has a fitted model with its bin labels.
fn apply_bin_mapping(
    df: DataFrame,
    target_cols: &[String],
    mapping: &HashMap<String, Discretizer>,
) -> DiscretizerResult<DataFrame> {
    let exprs: Vec<Expr> = df
        .schema()
        .fields()
        .iter()
        .map(|field| {
            let name = field.name();
            match mapping.get(name) {
                Some(model) if target_cols.contains(name) && !model.is_degenerate() => {
                    build_bin_case_expr(name, model, field.data_type().is_floating()).alias(name)
                }
                _ => col(name),
            }
        })
        .collect();
    df.select(exprs).map_err(DiscretizerError::from)
}

/// Splits numeric columns into bins holding roughly equal numbers of values.
pub struct QuantileDiscretizer {
    pub columns: Vec<String>,
    pub config: DiscretizeConfig,
    pub mapping: HashMap<String, Discretizer>,
    fitted: bool,
}

impl QuantileDiscretizer {
    pub fn new(columns: Vec<String>, config: DiscretizeConfig) -> Self {
        Self {
            columns,
            config,
            mapping: HashMap::new(),
            fitted: false,
        }
    }

    /// Returns the fitted model of a column.
    pub fn model(&self, col_name: &str) -> Option<&Discretizer> {
        self.mapping.get(col_name)
    }

    /// Returns the ordered label domain of a transformed column.
    ///
    /// `None` if the column has no fitted model or its model has no bins.
    pub fn domain(&self, col_name: &str) -> Option<Vec<String>> {
        self.mapping
            .get(col_name)
            .filter(|model| !model.is_degenerate())
            .map(Discretizer::domain)
    }

    /// Fit collects each target column and fits a discretizer on it.
    pub async fn fit(&mut self, df: &DataFrame) -> DiscretizerResult<()> {
        self.config.validate()?;
        let mut samples = Vec::with_capacity(self.columns.len());
        for col_name in &self.columns {
            validate_numeric_column(df, col_name)?;
            let values = collect_numeric_column(df, col_name).await?;
            samples.push((col_name.clone(), ColumnData::Numeric(values)));
        }
        let config = &self.config;
        let fitted = samples
            .par_iter()
            .map(|(name, sample)| fit(sample, config).map(|model| (name.clone(), model)))
            .collect::<DiscretizerResult<Vec<_>>>()?;
        for (name, model) in fitted {
            debug!("Column '{}': {} bins", name, model.bin_count());
            self.mapping.insert(name, model);
        }
        self.fitted = true;
        Ok(())
    }

    /// Transform replaces each target column with its bin labels.
    pub fn transform(&self, df: DataFrame) -> DiscretizerResult<DataFrame> {
        if !self.fitted {
            return Err(DiscretizerError::FitNotCalled);
        }
        for col_name in &self.columns {
            validate_numeric_column(&df, col_name)?;
        }
        apply_bin_mapping(df, &self.columns, &self.mapping)
    }

    // This transformer is stateful.
    fn inherent_is_stateful(&self) -> bool {
        true
    }
}

impl_transformer!(QuantileDiscretizer);
