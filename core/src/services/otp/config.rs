//! Configuration for the OTP lifecycle manager and its sweeper

use bmb_shared::config::OtpSettings;
use chrono::Duration;

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Default expiration time for codes (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 5;

/// Default retention after expiry before a record is purged (5 minutes)
pub const DEFAULT_GRACE_MINUTES: i64 = 5;

/// Configuration for the OTP lifecycle manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpManagerConfig {
    /// How long a generated code is accepted
    pub ttl: Duration,
    /// Verification attempts allowed per code
    pub max_attempts: u32,
    /// Retention after expiry before the sweep deletes a record
    pub grace: Duration,
}

impl Default for OtpManagerConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(DEFAULT_EXPIRATION_MINUTES),
            max_attempts: MAX_ATTEMPTS,
            grace: Duration::minutes(DEFAULT_GRACE_MINUTES),
        }
    }
}

impl From<&OtpSettings> for OtpManagerConfig {
    fn from(settings: &OtpSettings) -> Self {
        Self {
            ttl: Duration::minutes(settings.expiry_minutes),
            max_attempts: settings.max_attempts,
            grace: Duration::minutes(settings.grace_minutes),
        }
    }
}

/// Configuration for the periodic sweep task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    /// How often to sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether to run the background task at all
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

impl From<&OtpSettings> for SweepConfig {
    fn from(settings: &OtpSettings) -> Self {
        Self {
            interval_seconds: settings.sweep_interval_seconds,
            enabled: settings.sweep_enabled,
        }
    }
}
