//! ## Discretization Configuration
//!
//! [`DiscretizeConfig`] holds everything `fit` needs besides the sample itself.

use crate::exceptions::{DiscretizerError, DiscretizerResult};
use crate::quantile::QuantileOptions;

/// Default number of quantile intervals.
pub const DEFAULT_CUTS: usize = 4;
/// Default label prefix.
pub const DEFAULT_PREFIX: &str = "bin";
/// Default viability threshold (distinct values per bin).
pub const DEFAULT_MIN_UNIQUE: usize = 10;

/// Settings for fitting a [`crate::model::Discretizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct DiscretizeConfig {
    /// Number of quantile intervals requested (at least 2).
    pub cuts: usize,
    /// Explicit bin labels, used verbatim instead of generated names.
    pub labels: Option<Vec<String>>,
    /// Prefix for generated labels; rewritten to a valid identifier if needed.
    pub prefix: String,
    /// Add a dedicated category for missing values, ordered first.
    pub keep_missing: bool,
    /// Replace the outer breakpoints by -inf and +inf.
    pub unbounded_ends: bool,
    /// Minimum number of distinct values per requested bin for binning to go ahead.
    pub min_unique: usize,
    pub quantile_options: QuantileOptions,
}

impl Default for DiscretizeConfig {
    fn default() -> Self {
        Self {
            cuts: DEFAULT_CUTS,
            labels: None,
            prefix: DEFAULT_PREFIX.to_string(),
            keep_missing: true,
            unbounded_ends: true,
            min_unique: DEFAULT_MIN_UNIQUE,
            quantile_options: QuantileOptions::default(),
        }
    }
}

impl DiscretizeConfig {
    pub fn new(cuts: usize) -> Self {
        Self {
            cuts,
            ..Self::default()
        }
    }

    pub fn with_cuts(mut self, cuts: usize) -> Self {
        self.cuts = cuts;
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_keep_missing(mut self, keep_missing: bool) -> Self {
        self.keep_missing = keep_missing;
        self
    }

    pub fn with_unbounded_ends(mut self, unbounded_ends: bool) -> Self {
        self.unbounded_ends = unbounded_ends;
        self
    }

    pub fn with_min_unique(mut self, min_unique: usize) -> Self {
        self.min_unique = min_unique;
        self
    }

    pub fn with_quantile_options(mut self, options: QuantileOptions) -> Self {
        self.quantile_options = options;
        self
    }

    /// Checks the settings that can be rejected before looking at any data.
    pub fn validate(&self) -> DiscretizerResult<()> {
        if self.cuts < 2 {
            return Err(DiscretizerError::InvalidConfig(format!(
                "cuts must be at least 2, got {}",
                self.cuts
            )));
        }
        Ok(())
    }
}
