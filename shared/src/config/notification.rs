//! Notification (SMS) configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, env_string_or};

/// SMS provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProvider {
    /// Log-only simulator
    #[default]
    Mock,
    /// Twilio REST API
    Twilio,
}

impl std::str::FromStr for SmsProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(SmsProvider::Mock),
            "twilio" => Ok(SmsProvider::Twilio),
            _ => Err(format!("Unknown SMS provider: {}", s)),
        }
    }
}

/// Notification delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    /// SMS service provider
    #[serde(default)]
    pub provider: SmsProvider,

    /// Twilio account SID
    #[serde(default)]
    pub account_sid: String,

    /// Twilio auth token
    #[serde(default)]
    pub auth_token: String,

    /// Sender phone number
    #[serde(default)]
    pub from_number: String,

    /// Country code prefixed to numbers given without one
    #[serde(default = "default_country_code")]
    pub default_country_code: String,

    /// Maximum send attempts per message
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial delay between retries (doubles after each failure)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// HTTP request timeout for provider calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Capacity of the outbound notification queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            provider: SmsProvider::Mock,
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            default_country_code: default_country_code(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl NotificationConfig {
    /// Load from `SMS_*`, `TWILIO_*` and `NOTIFICATION_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("SMS_PROVIDER", defaults.provider),
            account_sid: env_string_or("TWILIO_ACCOUNT_SID", ""),
            auth_token: env_string_or("TWILIO_AUTH_TOKEN", ""),
            from_number: env_string_or("TWILIO_PHONE_NUMBER", ""),
            default_country_code: env_string_or(
                "SMS_DEFAULT_COUNTRY_CODE",
                &defaults.default_country_code,
            ),
            max_retries: env_or("SMS_MAX_RETRIES", defaults.max_retries).max(1),
            retry_delay_ms: env_or("SMS_RETRY_DELAY_MS", defaults.retry_delay_ms),
            request_timeout_secs: env_or("SMS_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            queue_capacity: env_or("NOTIFICATION_QUEUE_CAPACITY", defaults.queue_capacity).max(1),
        }
    }

    /// Whether Twilio credentials are complete
    pub fn has_twilio_credentials(&self) -> bool {
        !self.account_sid.is_empty() && !self.auth_token.is_empty() && !self.from_number.is_empty()
    }
}

fn default_country_code() -> String {
    String::from("+91")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_queue_capacity() -> usize {
    256
}
