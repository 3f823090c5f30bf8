//! Logging initialisation
//!
//! Installs a global `tracing` subscriber built from [`LoggingConfig`].
//! `RUST_LOG` takes precedence over the configured level so operators can
//! raise verbosity without touching config files.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};
use workbase_domain::{LoggingConfig, Result, WorkbaseError};

/// Build the filter from `RUST_LOG`, falling back to `config.level`.
///
/// # Errors
/// Returns `WorkbaseError::Config` if the configured level is not a valid
/// filter directive.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            WorkbaseError::Config(format!("Invalid log level '{}': {e}", config.level))
        }),
    }
}

/// Install the global subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed, which is the
/// normal case when a host application sets up its own logging first.
///
/// # Errors
/// Returns `WorkbaseError::Config` if the log level cannot be parsed.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = env_filter(config)?;

    let installed = if config.json {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
            .is_ok()
    } else {
        Registry::default().with(filter).with(fmt::layer().with_target(true)).try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "Tracing initialised");
    }
    Ok(installed)
}
