//! ## Bin Labels
//!
//! Labels are stored as base names and only turned into display names when asked for.
//! Generated labels are zero-padded ordinals (`"1"`, `"2"`, ... or `"01"` ... `"12"`), displayed
//! with the prefix in front (`"bin1"`). Override labels are stored and displayed verbatim. When the
//! missing category is kept, the reserved marker [`MISSING_SUFFIX`] is stored first and displayed
//! as `"<prefix>_missing"`, so it always sorts first in the domain.

use crate::exceptions::{DiscretizerError, DiscretizerResult};
use std::collections::HashSet;

/// Stored name of the missing category, appended to the prefix for display.
pub const MISSING_SUFFIX: &str = "_missing";

/// How the bin labels of a model were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelScheme {
    /// Zero-padded ordinals, displayed with the prefix.
    Ordinal,
    /// User-supplied labels, displayed as given.
    Custom,
}

impl LabelScheme {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelScheme::Ordinal => "ordinal",
            LabelScheme::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ordinal" => Some(LabelScheme::Ordinal),
            "custom" => Some(LabelScheme::Custom),
            _ => None,
        }
    }
}

/// Returns true for ASCII identifiers: a letter followed by letters, digits, or underscores.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Rewrites `prefix` into a valid identifier.
///
/// Invalid characters become underscores, and an `X` is prepended when the result does not
/// start with a letter. Valid prefixes are returned unchanged.
pub fn sanitize_prefix(prefix: &str) -> String {
    if is_valid_identifier(prefix) {
        return prefix.to_string();
    }
    let body: String = prefix
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    match body.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => body,
        _ => format!("X{}", body),
    }
}

/// Generates `bin_count` ordinal names, zero-padded to the width of `bin_count`.
pub fn ordinal_names(bin_count: usize) -> Vec<String> {
    let width = bin_count.to_string().len();
    (1..=bin_count)
        .map(|i| format!("{:0width$}", i, width = width))
        .collect()
}

/// Builds the stored label sequence for a model with `bin_count` bins.
///
/// `prefix` must already be sanitized; it is only used to check that the display names
/// are distinct.
pub fn make_labels(
    bin_count: usize,
    prefix: &str,
    overrides: Option<&[String]>,
    keep_missing: bool,
) -> DiscretizerResult<(Vec<String>, LabelScheme)> {
    let (names, scheme) = match overrides {
        Some(custom) => {
            if custom.len() != bin_count {
                return Err(DiscretizerError::InvalidConfig(format!(
                    "{} labels were given but the data supports {} bins",
                    custom.len(),
                    bin_count
                )));
            }
            if custom.iter().any(|l| l.is_empty()) {
                return Err(DiscretizerError::InvalidConfig(
                    "bin labels must not be empty".to_string(),
                ));
            }
            (custom.to_vec(), LabelScheme::Custom)
        }
        None => (ordinal_names(bin_count), LabelScheme::Ordinal),
    };

    let mut labels = Vec::with_capacity(names.len() + usize::from(keep_missing));
    if keep_missing {
        labels.push(MISSING_SUFFIX.to_string());
    }
    labels.extend(names);

    let display = display_labels(prefix, scheme, &labels, keep_missing);
    let mut seen = HashSet::with_capacity(display.len());
    if let Some(dup) = display.iter().find(|l| !seen.insert(l.as_str())) {
        return Err(DiscretizerError::InvalidConfig(format!(
            "bin labels must be distinct, '{}' appears more than once",
            dup
        )));
    }
    Ok((labels, scheme))
}

/// Derives display names from stored labels. Never mutates or caches anything.
pub fn display_labels(
    prefix: &str,
    scheme: LabelScheme,
    labels: &[String],
    keep_missing: bool,
) -> Vec<String> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            if keep_missing && i == 0 {
                format!("{}{}", prefix, MISSING_SUFFIX)
            } else {
                match scheme {
                    LabelScheme::Ordinal => format!("{}{}", prefix, label),
                    LabelScheme::Custom => label.clone(),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("bin"));
        assert!(is_valid_identifier("x_1"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("_x"));
        assert!(!is_valid_identifier("1x"));
        assert!(!is_valid_identifier("a-b"));
        assert!(!is_valid_identifier("é"));
    }

    #[test]
    fn test_sanitize_prefix() {
        assert_eq!(sanitize_prefix("bin"), "bin");
        assert_eq!(sanitize_prefix("my bin"), "my_bin");
        assert_eq!(sanitize_prefix("2nd"), "X2nd");
        assert_eq!(sanitize_prefix("_a"), "X_a");
        assert_eq!(sanitize_prefix(""), "X");
        assert_eq!(sanitize_prefix("a.b-c"), "a_b_c");
        // Sanitizing twice changes nothing.
        let once = sanitize_prefix("9 lives!");
        assert_eq!(sanitize_prefix(&once), once);
        assert!(is_valid_identifier(&once));
    }

    #[test]
    fn test_ordinal_width() {
        assert_eq!(ordinal_names(3), vec!["1", "2", "3"]);
        let names = ordinal_names(12);
        assert_eq!(names.first().map(String::as_str), Some("01"));
        assert_eq!(names.last().map(String::as_str), Some("12"));
        assert_eq!(ordinal_names(100)[4], "005");
    }

    #[test]
    fn test_missing_category_first() {
        let (labels, scheme) = make_labels(3, "bin", None, true).unwrap();
        assert_eq!(scheme, LabelScheme::Ordinal);
        assert_eq!(labels, vec![MISSING_SUFFIX, "1", "2", "3"]);
        assert_eq!(
            display_labels("bin", scheme, &labels, true),
            vec!["bin_missing", "bin1", "bin2", "bin3"]
        );
    }

    #[test]
    fn test_custom_labels_displayed_verbatim() {
        let custom = vec!["low".to_string(), "high".to_string()];
        let (labels, scheme) = make_labels(2, "bin", Some(&custom), true).unwrap();
        assert_eq!(scheme, LabelScheme::Custom);
        assert_eq!(
            display_labels("bin", scheme, &labels, true),
            vec!["bin_missing", "low", "high"]
        );
    }

    #[test]
    fn test_custom_label_errors() {
        let custom = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            make_labels(3, "bin", Some(&custom), false),
            Err(DiscretizerError::InvalidConfig(_))
        ));
        let dup = vec!["a".to_string(), "a".to_string()];
        assert!(make_labels(2, "bin", Some(&dup), false).is_err());
        let empty = vec!["a".to_string(), String::new()];
        assert!(make_labels(2, "bin", Some(&empty), false).is_err());
        let clash = vec!["bin_missing".to_string(), "b".to_string()];
        assert!(make_labels(2, "bin", Some(&clash), true).is_err());
        assert!(make_labels(2, "bin", Some(&clash), false).is_ok());
    }

    #[test]
    fn test_label_scheme_names() {
        for scheme in [LabelScheme::Ordinal, LabelScheme::Custom] {
            assert_eq!(LabelScheme::parse(scheme.as_str()), Some(scheme));
        }
        assert_eq!(LabelScheme::parse("other"), None);
    }
}
