//! ## Fitting
//!
//! [`fit`] builds a [`Discretizer`] from a training sample. The sample must be a numeric
//! [`ColumnData`]; anything else fails with a type mismatch before any work is done.

use crate::breaks::estimate_breaks;
use crate::column::ColumnData;
use crate::config::DiscretizeConfig;
use crate::diagnostics::Diagnostic;
use crate::exceptions::DiscretizerResult;
use crate::labels::{make_labels, sanitize_prefix};
use crate::model::Discretizer;
use tracing::debug;

/// A fitted model together with the non-fatal diagnostics raised while fitting it.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub model: Discretizer,
    pub diagnostics: Vec<Diagnostic>,
}

/// Fits a discretizer on `sample`.
///
/// # Errors
///
/// * `TypeMismatch` if `sample` is not numeric.
/// * `InvalidConfig` if `cuts < 2` or the label override does not match the bin count.
/// * `MissingValueInSample` if the sample has missing values and the quantile options do not
///   exclude them.
/// * `InvalidParameter` if a quantile falls between `-inf` and `+inf`.
pub fn fit(sample: &ColumnData, config: &DiscretizeConfig) -> DiscretizerResult<Discretizer> {
    fit_with_diagnostics(sample, config).map(|report| report.model)
}

/// Same as [`fit`], but also returns the diagnostics.
pub fn fit_with_diagnostics(
    sample: &ColumnData,
    config: &DiscretizeConfig,
) -> DiscretizerResult<FitReport> {
    config.validate()?;
    let values = sample.as_numeric()?;

    let mut diagnostics = Vec::new();
    let prefix = sanitize_prefix(&config.prefix);
    if prefix != config.prefix {
        diagnostics.push(Diagnostic::PrefixRewritten {
            original: config.prefix.clone(),
            rewritten: prefix.clone(),
        });
    }

    let model = match estimate_breaks(values, config, &mut diagnostics)? {
        None => Discretizer::degenerate(prefix, config.keep_missing),
        Some(breakpoints) => {
            let bin_count = breakpoints.len() - 1;
            let (labels, scheme) = make_labels(
                bin_count,
                &prefix,
                config.labels.as_deref(),
                config.keep_missing,
            )?;
            Discretizer::from_parts(
                breakpoints,
                bin_count,
                prefix,
                labels,
                scheme,
                config.keep_missing,
            )?
        }
    };

    for diagnostic in &diagnostics {
        diagnostic.emit();
    }
    debug!(
        "Fitted discretizer with {} bins on {} values",
        model.bin_count(),
        values.len()
    );
    Ok(FitReport { model, diagnostics })
}
