//! # Infrastructure Layer
//!
//! Concrete adapters for the Bite Me Buddy OTP lifecycle:
//! - **SMS**: notification transports (Twilio REST, console mock)
//! - **Storage**: OTP record stores (JSON file, Redis document)
//! - **Telemetry**: tracing subscriber setup
//! - **Bootstrap**: wiring of manager, dispatcher and sweeper from configuration
//!
//! ## Features
//!
//! - `redis-cache`: Enable the Redis record store (default)

// Re-export core types for convenience
pub use bmb_core::errors::*;

/// SMS service module - notification transports
pub mod sms;

/// Storage module - OTP record persistence
pub mod storage;

/// Telemetry module - tracing subscriber initialisation
pub mod telemetry;

/// Bootstrap module - runtime assembly
pub mod bootstrap;

pub use bootstrap::{initialize, load_config, OtpRuntime};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),

    /// Domain layer error surfaced during bootstrap
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Domain(inner) => inner,
            other => DomainError::Storage {
                message: other.to_string(),
            },
        }
    }
}

impl From<InfrastructureError> for NotificationError {
    fn from(err: InfrastructureError) -> Self {
        NotificationError::Transport {
            message: err.to_string(),
        }
    }
}
