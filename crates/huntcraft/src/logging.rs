//! Tracing subscriber setup.

use crate::{LogFormat, LoggingConfig};
use huntcraft_error::{ConfigError, HuntcraftResult};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured level.
///
/// # Errors
///
/// Returns a configuration error when the configured level is not a valid
/// filter directive.
pub fn build_filter(config: &LoggingConfig) -> HuntcraftResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(config.level()).map_err(|e| {
        ConfigError::new(format!("Invalid log level {:?}: {}", config.level(), e)).into()
    })
}

/// Installs the global tracing subscriber. Logs go to stderr.
///
/// # Errors
///
/// Returns a configuration error for an invalid level or when a global
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> HuntcraftResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config)?)
        .with_writer(std::io::stderr);

    let installed = match config.format() {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| {
        ConfigError::new(format!("Failed to install tracing subscriber: {}", e)).into()
    })
}
