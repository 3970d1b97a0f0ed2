//! ## Logging Configuration
//!
//! This module sets up logging automatically at program startup using the `ctor` crate.
//! Logging behavior is controlled by the `DEBUG_QUANTILE_DISCRETIZER` environment variable:
//!
//! - **Disabled** (default): If the variable is unset, empty, or explicitly set to `"0"` or `"false"`,
//!   no logging will be initialized.
//! - **Enabled**: Any other value enables logging with a maximum log level of `DEBUG`.
//!
//! Non-fatal diagnostics raised while fitting (skipped binning, merged bins, rewritten prefixes)
//! are emitted at `WARN` level, so they show up as soon as logging is enabled.
//!
//! ### Usage Example
//!
//! ```sh
//! export DEBUG_QUANTILE_DISCRETIZER=true
//! ```

use ctor::ctor;
use tracing::Level;

/// Name of the environment variable that switches logging on.
pub const DEBUG_ENV_VAR: &str = "DEBUG_QUANTILE_DISCRETIZER";

/// Returns true if the given value of [`DEBUG_ENV_VAR`] disables logging.
pub(crate) fn is_disabled(value: Option<&str>) -> bool {
    value.map_or(true, |v| v == "0" || v == "false" || v.is_empty())
}

#[ctor]
fn set_debug_level() {
    let value = std::env::var(DEBUG_ENV_VAR).ok();
    if !is_disabled(value.as_deref()) {
        // A host application may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .try_init();
    }
}
