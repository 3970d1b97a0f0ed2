//! ## Custom Errors for Quantile Discretizer
//!
//! This module defines the error type shared by the whole crate.
//! It uses the `thiserror` crate to derive the `Error` trait.
//! The `DiscretizerError` enum covers the fatal conditions raised while fitting or applying a
//! discretizer, plus wrappers for the I/O, Arrow, Parquet, and DataFusion layers around it.
//!
//! Recoverable conditions (skipped binning, merged bins, rewritten prefixes) are not errors;
//! see [`crate::diagnostics::Diagnostic`].
//!
//! ### Example
//!
//! ```rust
//! use quantile_discretizer::exceptions::{DiscretizerError, DiscretizerResult};
//!
//! fn check_cuts(cuts: usize) -> DiscretizerResult<()> {
//!     if cuts < 2 {
//!         return Err(DiscretizerError::InvalidConfig("cuts must be at least 2".into()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Errors specific to the Quantile Discretizer library.
#[derive(Debug, Error)]
pub enum DiscretizerError {
    /// Wraps underlying I/O errors.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Wraps errors from DataFusion.
    #[error("DataFusion error: {0}")]
    DataFusionError(#[from] datafusion::error::DataFusionError),

    /// Wraps errors from Arrow.
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Wraps errors from Parquet.
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// The data handed to `fit` or `apply` is not numeric.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// The discretization configuration is unusable (e.g. too few cuts, wrong label count).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Missing values reached the quantile computation without being excluded.
    #[error("Missing values in sample; enable missing-value exclusion in the quantile options")]
    MissingValueInSample,

    /// Quantiles were requested over a sample with no usable values.
    #[error("Cannot compute quantiles of an empty sample")]
    EmptySample,

    /// A fitted model violates its own invariants (e.g. corrupted persisted state).
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Indicates that an invalid parameter was provided to a helper or adapter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Indicates that the specified column does not exist in the DataFrame.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Indicates the transform method was called before calling fit for a stateful transformer.
    #[error("Transform called before fit for stateful transformer")]
    FitNotCalled,
}

/// A convenient result type for Quantile Discretizer operations.
pub type DiscretizerResult<T> = std::result::Result<T, DiscretizerError>;
