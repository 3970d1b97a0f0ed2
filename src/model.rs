//! ## Fitted Discretizer
//!
//! [`Discretizer`] is the immutable result of [`crate::fit::fit`]: breakpoints, stored labels, and
//! the flags needed to apply them. It has no mutation API; every field is private and read through
//! getters. Display labels are recomputed from `(prefix, stored label)` on every call.

use crate::exceptions::{DiscretizerError, DiscretizerResult};
use crate::labels::{self, LabelScheme, MISSING_SUFFIX};

/// Quantile bin boundaries and their labels, fitted on a training sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Discretizer {
    breakpoints: Vec<f64>,
    bin_count: usize,
    prefix: String,
    labels: Vec<String>,
    label_scheme: LabelScheme,
    keep_missing: bool,
}

impl Discretizer {
    /// A model with zero bins; applying it passes values through unchanged.
    pub(crate) fn degenerate(prefix: String, keep_missing: bool) -> Self {
        Self {
            breakpoints: Vec::new(),
            bin_count: 0,
            prefix,
            labels: Vec::new(),
            label_scheme: LabelScheme::Ordinal,
            keep_missing,
        }
    }

    /// Rebuilds a model from its persisted fields, checking every invariant.
    pub fn from_parts(
        breakpoints: Vec<f64>,
        bin_count: usize,
        prefix: String,
        labels: Vec<String>,
        label_scheme: LabelScheme,
        keep_missing: bool,
    ) -> DiscretizerResult<Self> {
        let model = Self {
            breakpoints,
            bin_count,
            prefix,
            labels,
            label_scheme,
            keep_missing,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Number of bins, or 0 when binning was skipped.
    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Stored labels (base names), including the missing marker when it is kept.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_scheme(&self) -> LabelScheme {
        self.label_scheme
    }

    pub fn keep_missing(&self) -> bool {
        self.keep_missing
    }

    pub fn is_degenerate(&self) -> bool {
        self.bin_count == 0
    }

    /// Display names in domain order.
    pub fn display_labels(&self) -> Vec<String> {
        labels::display_labels(
            &self.prefix,
            self.label_scheme,
            &self.labels,
            self.keep_missing,
        )
    }

    /// The fixed, ordered categorical domain produced by `apply`.
    pub fn domain(&self) -> Vec<String> {
        self.display_labels()
    }

    /// Index of the missing category in the domain, if it is kept.
    pub fn missing_index(&self) -> Option<usize> {
        (self.keep_missing && !self.is_degenerate()).then_some(0)
    }

    /// Checks the model invariants.
    pub fn validate(&self) -> DiscretizerResult<()> {
        if !labels::is_valid_identifier(&self.prefix) {
            return Err(invalid(format!("prefix '{}' is not valid", self.prefix)));
        }
        if self.bin_count == 0 {
            if !self.breakpoints.is_empty() || !self.labels.is_empty() {
                return Err(invalid(
                    "a model without bins must have no breakpoints and no labels".to_string(),
                ));
            }
            return Ok(());
        }
        if self.breakpoints.len() != self.bin_count + 1 {
            return Err(invalid(format!(
                "{} breakpoints for {} bins",
                self.breakpoints.len(),
                self.bin_count
            )));
        }
        if self.breakpoints.iter().any(|b| b.is_nan()) {
            return Err(invalid("breakpoints contain NaN".to_string()));
        }
        if self.breakpoints.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid(
                "breakpoints are not strictly increasing".to_string(),
            ));
        }
        let expected = self.bin_count + usize::from(self.keep_missing);
        if self.labels.len() != expected {
            return Err(invalid(format!(
                "{} labels for {} bins (expected {})",
                self.labels.len(),
                self.bin_count,
                expected
            )));
        }
        if self.keep_missing && self.labels[0] != MISSING_SUFFIX {
            return Err(invalid(format!(
                "first label must be the missing marker '{}'",
                MISSING_SUFFIX
            )));
        }
        let names = &self.labels[usize::from(self.keep_missing)..];
        match self.label_scheme {
            LabelScheme::Ordinal => {
                if names != labels::ordinal_names(self.bin_count).as_slice() {
                    return Err(invalid(format!(
                        "ordinal labels do not match {} bins",
                        self.bin_count
                    )));
                }
            }
            LabelScheme::Custom => {
                labels::make_labels(self.bin_count, &self.prefix, Some(names), self.keep_missing)
                    .map_err(|e| match e {
                        DiscretizerError::InvalidConfig(message) => invalid(message),
                        other => other,
                    })?;
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> DiscretizerError {
    DiscretizerError::InvalidModel(message)
}
