//! Stderr logging for the worker and CLI, backed by `env_logger`.
//!
//! [`LOG_ENV`] takes the usual env_logger directives, so per-target filters
//! such as `gensprite_worker=warn,reqwest=debug` work.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "GENSPRITE_LOG";

/// Filter used when [`LOG_ENV`] is unset.
pub const DEFAULT_FILTER: &str = "info";

/// A logger builder reading its filter from `env`. `--verbose` replaces the
/// filter with debug for every target.
pub fn builder(env: Env<'_>, verbose: bool) -> Builder {
    let mut builder = if verbose {
        let mut builder = Builder::new();
        builder.filter_level(LevelFilter::Debug);
        builder
    } else {
        Builder::from_env(env)
    };
    builder.format_timestamp_millis();
    builder
}

/// Installs the logger. A second call keeps the first logger.
pub fn init(verbose: bool) {
    let _ = builder(Env::new().filter_or(LOG_ENV, DEFAULT_FILTER), verbose).try_init();
}
