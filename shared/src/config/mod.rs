//! Configuration module with concern-specific sub-modules
//!
//! - `environment` - Environment detection and logging configuration
//! - `otp` - OTP lifetime, attempt budget and sweep schedule
//! - `notification` - SMS provider selection and delivery policy
//! - `storage` - Backend used to persist OTP records

pub mod environment;
pub mod notification;
pub mod otp;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use notification::{NotificationConfig, SmsProvider};
pub use otp::OtpSettings;
pub use storage::{StorageBackend, StorageConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// OTP lifecycle configuration
    pub otp: OtpSettings,

    /// Notification (SMS) configuration
    pub notification: NotificationConfig,

    /// OTP record storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            otp: OtpSettings::from_env(),
            notification: NotificationConfig::from_env(),
            storage: StorageConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when the variable is missing or malformed.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a string environment variable with a default
pub(crate) fn env_string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
