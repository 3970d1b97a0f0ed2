//! # Quantile Discretizer
//!
//! Fits quantile-derived bin boundaries on a numeric training sample and maps numeric values
//! (training or future) onto a small set of ordered categorical labels with roughly equal
//! population per bin.
//!
//! The core is two operations:
//!
//! - [`fit`]: estimate breakpoints from a sample and build an immutable [`Discretizer`].
//! - [`apply`]: map values onto the bins of a fitted model.
//!
//! ```rust
//! use quantile_discretizer::{apply, fit, ColumnData, DiscretizeConfig};
//!
//! let sample: Vec<f64> = (1..=100).map(f64::from).collect();
//! let config = DiscretizeConfig::new(4).with_unbounded_ends(false);
//! let model = fit(&ColumnData::from(sample), &config).unwrap();
//! assert_eq!(model.breakpoints(), &[1.0, 25.75, 50.5, 75.25, 100.0]);
//!
//! let binned = apply(&model, &ColumnData::from(vec![1.0, 60.0, 1000.0])).unwrap();
//! let column = binned.as_categorical().unwrap();
//! assert_eq!(column.labels(), vec![Some("bin1"), Some("bin3"), None]);
//! ```
//!
//! A fitted model can be persisted with [`persistence`], and DataFusion DataFrames are
//! supported through [`transformers::discretization::QuantileDiscretizer`].

pub mod apply;
pub mod breaks;
pub mod column;
pub mod config;
pub mod diagnostics;
pub mod exceptions;
pub mod fit;
pub mod labels;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod quantile;
pub mod transformer;
pub mod transformers;

pub use apply::{apply, apply_batch, Binned, CategoricalColumn};
pub use column::ColumnData;
pub use config::DiscretizeConfig;
pub use diagnostics::Diagnostic;
pub use exceptions::{DiscretizerError, DiscretizerResult};
pub use fit::{fit, fit_with_diagnostics, FitReport};
pub use model::Discretizer;
pub use quantile::{QuantileOptions, QuantileType};
