//! ## Sample Quantiles
//!
//! This module computes sample quantiles using the nine definitions of Hyndman & Fan (1996),
//! "Sample Quantiles in Statistical Packages", *The American Statistician* 50(4).
//! Type 7 (linear interpolation between order statistics, `h = (n - 1) p + 1`) is the default.
//!
//! [`QuantileOptions`] is passed by value to [`quantiles`]. It only carries the estimator settings;
//! the sample and the probabilities are always separate arguments, and building options from
//! key/value pairs rejects keys that would try to set them.

use crate::column::present;
use crate::exceptions::{DiscretizerError, DiscretizerResult};
use std::str::FromStr;

/// Option keys that name the estimator inputs and can never be set through options.
pub const RESERVED_OPTION_KEYS: [&str; 4] = ["x", "sample", "probs", "probabilities"];

/// One of the nine Hyndman & Fan sample quantile definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuantileType {
    /// Inverse of the empirical distribution function.
    Type1,
    /// Like type 1, averaging at discontinuities.
    Type2,
    /// Nearest even order statistic.
    Type3,
    /// Linear interpolation of the empirical CDF.
    Type4,
    /// Piecewise linear, knots at the midpoints of the steps.
    Type5,
    /// `p(k) = k / (n + 1)`.
    Type6,
    /// `p(k) = (k - 1) / (n - 1)`.
    #[default]
    Type7,
    /// Approximately median-unbiased.
    Type8,
    /// Approximately unbiased for normal samples.
    Type9,
}

impl QuantileType {
    pub fn from_code(code: u8) -> DiscretizerResult<Self> {
        Ok(match code {
            1 => QuantileType::Type1,
            2 => QuantileType::Type2,
            3 => QuantileType::Type3,
            4 => QuantileType::Type4,
            5 => QuantileType::Type5,
            6 => QuantileType::Type6,
            7 => QuantileType::Type7,
            8 => QuantileType::Type8,
            9 => QuantileType::Type9,
            other => {
                return Err(DiscretizerError::InvalidConfig(format!(
                    "quantile type must be between 1 and 9, got {}",
                    other
                )))
            }
        })
    }

    pub fn code(self) -> u8 {
        match self {
            QuantileType::Type1 => 1,
            QuantileType::Type2 => 2,
            QuantileType::Type3 => 3,
            QuantileType::Type4 => 4,
            QuantileType::Type5 => 5,
            QuantileType::Type6 => 6,
            QuantileType::Type7 => 7,
            QuantileType::Type8 => 8,
            QuantileType::Type9 => 9,
        }
    }

    /// Plotting position parameters `(a, b)` for the continuous types 4 to 9.
    fn plotting_position(self) -> Option<(f64, f64)> {
        match self {
            QuantileType::Type4 => Some((0.0, 1.0)),
            QuantileType::Type5 => Some((0.5, 0.5)),
            QuantileType::Type6 => Some((0.0, 0.0)),
            QuantileType::Type7 => Some((1.0, 1.0)),
            QuantileType::Type8 => Some((1.0 / 3.0, 1.0 / 3.0)),
            QuantileType::Type9 => Some((3.0 / 8.0, 3.0 / 8.0)),
            _ => None,
        }
    }
}

/// Settings forwarded to the quantile estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantileOptions {
    pub method: QuantileType,
    /// Drop missing values before computing quantiles instead of failing.
    pub exclude_missing: bool,
}

impl QuantileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: QuantileType) -> Self {
        self.method = method;
        self
    }

    pub fn with_exclude_missing(mut self, exclude_missing: bool) -> Self {
        self.exclude_missing = exclude_missing;
        self
    }

    /// Builds options from string key/value pairs.
    ///
    /// Recognized keys are `type` (or `method`) with a value from 1 to 9, and `na_rm`
    /// (or `exclude_missing`) with a boolean value. Reserved keys (see [`RESERVED_OPTION_KEYS`])
    /// and unknown keys are rejected with [`DiscretizerError::InvalidConfig`].
    pub fn from_pairs<I, K, V>(pairs: I) -> DiscretizerResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let key = key.as_ref().trim();
            let value = value.as_ref().trim();
            if RESERVED_OPTION_KEYS.contains(&key) {
                return Err(DiscretizerError::InvalidConfig(format!(
                    "quantile option '{}' is reserved and cannot be overridden",
                    key
                )));
            }
            match key {
                "type" | "method" => {
                    let code = u8::from_str(value).map_err(|_| {
                        DiscretizerError::InvalidConfig(format!(
                            "quantile type must be an integer, got '{}'",
                            value
                        ))
                    })?;
                    options.method = QuantileType::from_code(code)?;
                }
                "na_rm" | "exclude_missing" => {
                    options.exclude_missing = parse_bool(value).ok_or_else(|| {
                        DiscretizerError::InvalidConfig(format!(
                            "option '{}' must be a boolean, got '{}'",
                            key, value
                        ))
                    })?;
                }
                other => {
                    return Err(DiscretizerError::InvalidConfig(format!(
                        "unknown quantile option '{}'",
                        other
                    )))
                }
            }
        }
        Ok(options)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Computes the quantiles of `sample` at each probability in `probs`.
///
/// Missing values (`None` or NaN) fail with [`DiscretizerError::MissingValueInSample`] unless
/// `options.exclude_missing` is set. A quantile that interpolates between `-inf` and `+inf` fails
/// with [`DiscretizerError::InvalidParameter`].
pub fn quantiles(
    sample: &[Option<f64>],
    probs: &[f64],
    options: &QuantileOptions,
) -> DiscretizerResult<Vec<f64>> {
    if let Some(p) = probs.iter().find(|p| !(0.0..=1.0).contains(*p)) {
        return Err(DiscretizerError::InvalidParameter(format!(
            "probabilities must lie in [0, 1], got {}",
            p
        )));
    }
    let mut sorted = Vec::with_capacity(sample.len());
    for value in sample {
        match present(*value) {
            Some(v) => sorted.push(v),
            None if options.exclude_missing => {}
            None => return Err(DiscretizerError::MissingValueInSample),
        }
    }
    if sorted.is_empty() {
        return Err(DiscretizerError::EmptySample);
    }
    sorted.sort_unstable_by(f64::total_cmp);
    probs
        .iter()
        .map(|&p| {
            let q = quantile_sorted(&sorted, p, options.method);
            // Interpolating between -inf and +inf has no value.
            if q.is_nan() {
                Err(DiscretizerError::InvalidParameter(format!(
                    "quantile at probability {} falls between -inf and +inf",
                    p
                )))
            } else {
                Ok(q)
            }
        })
        .collect()
}

/// Computes one quantile of a non-empty sample sorted in ascending order.
pub fn quantile_sorted(sorted: &[f64], p: f64, method: QuantileType) -> f64 {
    let n = sorted.len() as f64;
    let fuzz = 4.0 * f64::EPSILON;

    let (j, h) = match method.plotting_position() {
        Some((a, b)) => {
            let nppm = a + p * (n + 1.0 - a - b);
            let j = (nppm + fuzz).floor();
            let h = nppm - j;
            (j, if h.abs() < fuzz { 0.0 } else { h })
        }
        None => {
            let nppm = if method == QuantileType::Type3 {
                n * p - 0.5
            } else {
                n * p
            };
            let j = (nppm + fuzz).floor();
            let above = nppm > j + fuzz;
            let h = match method {
                QuantileType::Type1 => f64::from(u8::from(above)),
                QuantileType::Type2 => (f64::from(u8::from(above)) + 1.0) / 2.0,
                _ => f64::from(u8::from(above || (j as i64).rem_euclid(2) == 1)),
            };
            (j, h)
        }
    };

    let lower = order_statistic(sorted, j as i64);
    let upper = order_statistic(sorted, j as i64 + 1);
    if h == 0.0 || lower == upper {
        lower
    } else if h == 1.0 {
        upper
    } else {
        (1.0 - h) * lower + h * upper
    }
}

/// The `k`-th order statistic (1-based), clamped to the sample range.
fn order_statistic(sorted: &[f64], k: i64) -> f64 {
    let n = sorted.len() as i64;
    sorted[(k.clamp(1, n) - 1) as usize]
}
