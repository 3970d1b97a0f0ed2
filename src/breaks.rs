//! ## Breakpoint Estimation
//!
//! Turns a numeric sample into ascending, strictly increasing bin boundaries:
//!
//! 1. Skip binning when the sample has too few distinct values for the requested bins.
//! 2. Take `cuts + 1` quantiles at evenly spaced probabilities from 0 to 1.
//! 3. Merge duplicate quantiles.
//! 4. Optionally widen the outer boundaries to -inf and +inf.
//!
//! Steps 1 and 3 raise [`Diagnostic`]s rather than errors.

use crate::column::present;
use crate::config::DiscretizeConfig;
use crate::diagnostics::Diagnostic;
use crate::exceptions::DiscretizerResult;
use crate::quantile::quantiles;
use std::collections::HashSet;

/// Counts distinct values; all missing values together count as one.
pub fn distinct_count(sample: &[Option<f64>]) -> usize {
    let mut seen = HashSet::with_capacity(sample.len());
    let mut has_missing = false;
    for value in sample {
        match present(*value) {
            // -0.0 and 0.0 are the same value.
            Some(v) => {
                seen.insert((v + 0.0).to_bits());
            }
            None => has_missing = true,
        }
    }
    seen.len() + usize::from(has_missing)
}

/// Returns true when `distinct / (cuts + 1)` reaches `min_unique`.
pub fn is_viable(distinct: usize, cuts: usize, min_unique: usize) -> bool {
    distinct as f64 / (cuts + 1) as f64 >= min_unique as f64
}

/// `cuts + 1` evenly spaced probabilities from 0 to 1 inclusive.
pub fn probabilities(cuts: usize) -> Vec<f64> {
    (0..=cuts).map(|i| i as f64 / cuts as f64).collect()
}

/// Removes repeated boundaries from an ascending sequence.
pub fn dedup_breaks(breaks: &mut Vec<f64>) {
    breaks.dedup();
}

/// Estimates breakpoints for `sample`.
///
/// Returns `Ok(None)` when binning is not viable, in which case the model has no bins.
pub fn estimate_breaks(
    sample: &[Option<f64>],
    config: &DiscretizeConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> DiscretizerResult<Option<Vec<f64>>> {
    let distinct = distinct_count(sample);
    if !is_viable(distinct, config.cuts, config.min_unique) {
        diagnostics.push(Diagnostic::TooFewUniqueValues {
            distinct,
            cuts: config.cuts,
            min_unique: config.min_unique,
        });
        return Ok(None);
    }

    let mut breaks = quantiles(
        sample,
        &probabilities(config.cuts),
        &config.quantile_options,
    )?;
    dedup_breaks(&mut breaks);

    if config.unbounded_ends && breaks.len() >= 2 {
        let last = breaks.len() - 1;
        breaks[0] = f64::NEG_INFINITY;
        breaks[last] = f64::INFINITY;
        dedup_breaks(&mut breaks);
    }

    if breaks.len() < 2 {
        tracing::debug!(
            "all quantiles collapsed to a single value; binning skipped"
        );
        diagnostics.push(Diagnostic::BinsReduced {
            requested: config.cuts,
            achieved: 0,
        });
        return Ok(None);
    }

    let achieved = breaks.len() - 1;
    if achieved < config.cuts {
        diagnostics.push(Diagnostic::BinsReduced {
            requested: config.cuts,
            achieved,
        });
    }
    Ok(Some(breaks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_count_with_missing() {
        let sample = vec![Some(1.0), Some(1.0), None, Some(f64::NAN), Some(2.0)];
        assert_eq!(distinct_count(&sample), 3);
        assert_eq!(distinct_count(&[Some(0.0), Some(-0.0)]), 1);
        assert_eq!(distinct_count(&[]), 0);
    }

    #[test]
    fn test_viability_threshold() {
        // 50 distinct values over 5 quantiles gives 10 per bin.
        assert!(is_viable(50, 4, 10));
        assert!(!is_viable(49, 4, 10));
        assert!(is_viable(0, 4, 0));
    }

    #[test]
    fn test_probabilities() {
        assert_eq!(probabilities(4), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(probabilities(3).last(), Some(&1.0));
    }

    #[test]
    fn test_duplicate_quantiles_are_merged() {
        let mut sample: Vec<Option<f64>> = vec![Some(0.0); 80];
        sample.extend((1..=20).map(|v| Some(f64::from(v))));
        let config = DiscretizeConfig::default()
            .with_min_unique(0)
            .with_unbounded_ends(false);
        let mut diagnostics = Vec::new();
        let breaks = estimate_breaks(&sample, &config, &mut diagnostics)
            .unwrap()
            .unwrap();
        assert_eq!(breaks, vec![0.0, 20.0]);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::BinsReduced {
                requested: 4,
                achieved: 1
            }]
        );
    }

    #[test]
    fn test_constant_sample_is_degenerate() {
        let sample = vec![Some(5.0); 10];
        let config = DiscretizeConfig::default().with_min_unique(0);
        let mut diagnostics = Vec::new();
        let breaks = estimate_breaks(&sample, &config, &mut diagnostics).unwrap();
        assert!(breaks.is_none());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_two_breaks_become_full_line() {
        let sample = vec![Some(1.0), Some(2.0)];
        let config = DiscretizeConfig::new(2).with_min_unique(0);
        let mut diagnostics = Vec::new();
        let breaks = estimate_breaks(&sample, &config, &mut diagnostics)
            .unwrap()
            .unwrap();
        assert_eq!(breaks, vec![f64::NEG_INFINITY, 1.5, f64::INFINITY]);
        assert!(diagnostics.is_empty());
    }
}
