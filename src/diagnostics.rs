//! ## Non-fatal Diagnostics
//!
//! Fitting can succeed while still falling short of what was asked for. Those cases are
//! reported as [`Diagnostic`] values instead of errors: they are returned alongside the model by
//! [`crate::fit::fit_with_diagnostics`] and always logged at `WARN` level.

use std::fmt;

/// A recoverable condition raised while fitting a discretizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The sample has too few distinct values for the requested bins; binning was skipped.
    TooFewUniqueValues {
        distinct: usize,
        cuts: usize,
        min_unique: usize,
    },
    /// Duplicate quantiles were merged, so fewer bins than requested were produced.
    BinsReduced { requested: usize, achieved: usize },
    /// The label prefix was not a valid identifier and has been rewritten.
    PrefixRewritten { original: String, rewritten: String },
}

impl Diagnostic {
    pub(crate) fn emit(&self) {
        tracing::warn!("{}", self);
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TooFewUniqueValues {
                distinct,
                cuts,
                min_unique,
            } => write!(
                f,
                "too few unique values ({}) to support {} bins with at least {} unique values per bin; \
                 binning skipped (adjust `min_unique` to change the viability threshold)",
                distinct, cuts, min_unique
            ),
            Diagnostic::BinsReduced {
                requested,
                achieved,
            } => write!(
                f,
                "duplicate quantiles merged: requested {} bins but only {} could be formed",
                requested, achieved
            ),
            Diagnostic::PrefixRewritten {
                original,
                rewritten,
            } => write!(
                f,
                "prefix '{}' is not a valid name; using '{}' instead",
                original, rewritten
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let d = Diagnostic::TooFewUniqueValues {
            distinct: 3,
            cuts: 4,
            min_unique: 10,
        };
        assert!(d.to_string().contains("too few unique values (3)"));
        assert!(d.to_string().contains("min_unique"));

        let d = Diagnostic::BinsReduced {
            requested: 4,
            achieved: 2,
        };
        assert!(d.to_string().contains("requested 4 bins but only 2"));

        let d = Diagnostic::PrefixRewritten {
            original: "2 bins".into(),
            rewritten: "X2_bins".into(),
        };
        assert!(d.to_string().contains("'2 bins'"));
        assert!(d.to_string().contains("'X2_bins'"));
    }
}
