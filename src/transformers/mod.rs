//! # Transformer Implementations
//!
//! DataFrame-level transformers built on the discretization core.

pub mod discretization;
