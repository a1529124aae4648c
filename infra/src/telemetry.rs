//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use bmb_shared::config::{LogFormat, LoggingConfig};

use crate::InfrastructureError;

/// Build the filter for a configured level or directive list
pub fn build_filter(level: &str) -> Result<EnvFilter, InfrastructureError> {
    EnvFilter::try_new(level)
        .map_err(|e| InfrastructureError::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), InfrastructureError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(&config.level)?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match (config.format, config.timestamp) {
        (LogFormat::Json, true) => builder.json().try_init(),
        (LogFormat::Json, false) => builder.json().without_time().try_init(),
        (LogFormat::Pretty, true) => builder.pretty().try_init(),
        (LogFormat::Pretty, false) => builder.pretty().without_time().try_init(),
        (LogFormat::Compact, true) => builder.compact().try_init(),
        (LogFormat::Compact, false) => builder.compact().without_time().try_init(),
    };

    result.map_err(|e| InfrastructureError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
