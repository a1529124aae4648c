//! OTP lifecycle configuration module

use serde::{Deserialize, Serialize};

use super::env_or;

/// Settings governing OTP lifetime, attempts and the cleanup sweep
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpSettings {
    /// Minutes a generated code stays valid
    #[serde(default = "default_expiry_minutes")]
    pub expiry_minutes: i64,

    /// Verification attempts allowed per generated code
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minutes an expired record is retained before the sweep purges it
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: i64,

    /// Seconds between two sweep passes
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,

    /// Whether the background sweep runs at all
    #[serde(default = "default_sweep_enabled")]
    pub sweep_enabled: bool,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            expiry_minutes: default_expiry_minutes(),
            max_attempts: default_max_attempts(),
            grace_minutes: default_grace_minutes(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
            sweep_enabled: default_sweep_enabled(),
        }
    }
}

impl OtpSettings {
    /// Load from `OTP_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expiry_minutes: env_or("OTP_EXPIRY_MINUTES", defaults.expiry_minutes).max(1),
            max_attempts: env_or("OTP_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            grace_minutes: env_or("OTP_GRACE_MINUTES", defaults.grace_minutes).max(0),
            sweep_interval_seconds: env_or(
                "OTP_SWEEP_INTERVAL_SECONDS",
                defaults.sweep_interval_seconds,
            )
            .max(1),
            sweep_enabled: env_or("OTP_SWEEP_ENABLED", defaults.sweep_enabled),
        }
    }
}

fn default_expiry_minutes() -> i64 {
    5
}

fn default_max_attempts() -> u32 {
    3
}

fn default_grace_minutes() -> i64 {
    5
}

fn default_sweep_interval_seconds() -> u64 {
    60
}

fn default_sweep_enabled() -> bool {
    true
}
