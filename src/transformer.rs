//! ## Transformer Interface
//!
//! The seam through which a DataFrame-level pipeline drives discretization. A pipeline fits a
//! transformer once on training data and then calls `transform` on any number of DataFrames.
//! Pipeline assembly itself is left to the caller.
//!
//! The [`crate::impl_transformer`] macro implements [`Transformer`] on top of inherent methods.

use crate::exceptions::DiscretizerResult;
use async_trait::async_trait;
use datafusion::prelude::DataFrame;

/// A fit/transform step over DataFusion DataFrames.
#[async_trait]
pub trait Transformer {
    /// Learns whatever state the transformer needs from `df`.
    async fn fit(&mut self, df: &DataFrame) -> DiscretizerResult<()>;

    /// Returns a new DataFrame with the transformation added to its logical plan.
    /// No data is read until the result is collected.
    fn transform(&self, df: DataFrame) -> DiscretizerResult<DataFrame>;

    /// Returns true if `fit` must be called before `transform`.
    fn is_stateful(&self) -> bool;
}

/// Implements [`Transformer`] for a type with these inherent methods:
/// - `async fn fit(&mut self, &DataFrame) -> DiscretizerResult<()>`
/// - `fn transform(&self, DataFrame) -> DiscretizerResult<DataFrame>`
/// - `fn inherent_is_stateful(&self) -> bool`
#[macro_export]
macro_rules! impl_transformer {
    ($ty:ty) => {
        #[async_trait::async_trait]
        impl $crate::transformer::Transformer for $ty {
            async fn fit(
                &mut self,
                df: &datafusion::prelude::DataFrame,
            ) -> $crate::exceptions::DiscretizerResult<()> {
                <$ty>::fit(self, df).await
            }
            fn transform(
                &self,
                df: datafusion::prelude::DataFrame,
            ) -> $crate::exceptions::DiscretizerResult<datafusion::prelude::DataFrame> {
                <$ty>::transform(self, df)
            }
            fn is_stateful(&self) -> bool {
                <$ty>::inherent_is_stateful(self)
            }
        }
    };
}
