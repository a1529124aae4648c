//! Twilio SMS Service Implementation
//!
//! Sends messages through the Twilio Messages REST resource.
//!
//! ## Features
//!
//! - E.164 normalisation with a configurable default country code
//! - Automatic retry with exponential backoff on throttling and server errors
//! - No retry on client errors (bad number, bad credentials)
//! - Phone number masking in logs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use bmb_core::errors::NotificationError;
use bmb_core::services::NotificationTransport;
use bmb_core::OrderId;
use bmb_shared::config::NotificationConfig;
use bmb_shared::utils::phone::{is_valid_international_phone, mask_phone_number, to_e164};

use crate::InfrastructureError;

/// Twilio API root
pub const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Maximum message body accepted by Twilio
pub const MAX_MESSAGE_LENGTH: usize = 1600;

/// Twilio SMS service configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// From phone number (must be a Twilio phone number)
    pub from_number: String,
    /// Country code applied to numbers without one
    pub default_country_code: String,
    /// Maximum send attempts for a message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
    /// API root, overridable for tests
    pub api_base: String,
}

impl From<&NotificationConfig> for TwilioConfig {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            from_number: config.from_number.clone(),
            default_country_code: config.default_country_code.clone(),
            max_retries: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
            request_timeout_secs: config.request_timeout_secs,
            api_base: TWILIO_API_BASE.to_string(),
        }
    }
}

impl TwilioConfig {
    /// Reject configurations Twilio would refuse anyway
    pub fn validate(&self) -> Result<(), InfrastructureError> {
        if self.account_sid.is_empty() || self.auth_token.is_empty() {
            return Err(InfrastructureError::Config(
                "TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN must be set".to_string(),
            ));
        }
        if !self.from_number.starts_with('+') {
            return Err(InfrastructureError::Config(
                "TWILIO_PHONE_NUMBER must be in E.164 format (starting with '+')".to_string(),
            ));
        }
        Ok(())
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            self.account_sid
        )
    }
}

#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    message: String,
}

/// Failure of a single request
struct AttemptError {
    retryable: bool,
    message: String,
}

/// Twilio SMS service implementation
pub struct TwilioSmsService {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioSmsService {
    /// Create a new Twilio SMS service
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Twilio SMS service initialized with from number: {}",
            mask_phone_number(&config.from_number)
        );

        Ok(Self { client, config })
    }

    /// Validate and normalize phone number to E.164 format
    fn validate_phone_number(&self, phone: &str) -> Result<String, NotificationError> {
        let normalized = to_e164(phone, &self.config.default_country_code);
        if is_valid_international_phone(&normalized) {
            debug!("Validated phone number: {}", mask_phone_number(&normalized));
            Ok(normalized)
        } else {
            error!("Invalid phone number format: {}", mask_phone_number(phone));
            Err(NotificationError::InvalidPhone {
                phone: mask_phone_number(phone),
            })
        }
    }

    async fn post_message(&self, to: &str, body: &str) -> Result<String, AttemptError> {
        let response = self
            .client
            .post(self.config.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("To", to), ("From", self.config.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| AttemptError {
                retryable: e.is_timeout() || e.is_connect() || e.is_request(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            let resource: MessageResource = response.json().await.map_err(|e| AttemptError {
                retryable: false,
                message: format!("Unexpected Twilio response: {}", e),
            })?;
            return Ok(resource.sid);
        }

        let detail = match response.json::<ApiErrorBody>().await {
            Ok(body) => match body.code {
                Some(code) => format!("{} (code {}): {}", status, code, body.message),
                None => format!("{}: {}", status, body.message),
            },
            Err(_) => status.to_string(),
        };

        Err(AttemptError {
            retryable: status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
            message: detail,
        })
    }

    /// Send SMS with retry logic
    async fn send_with_retry(&self, to: &str, message: &str) -> Result<String, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                self.config.max_retries,
                mask_phone_number(to)
            );

            match self.post_message(to, message).await {
                Ok(sid) => {
                    info!(
                        "SMS sent successfully to {} with SID: {}",
                        mask_phone_number(to),
                        sid
                    );
                    return Ok(sid);
                }
                Err(e) => {
                    error!(
                        "Failed to send SMS (attempt {}/{}): {}",
                        attempts, self.config.max_retries, e.message
                    );

                    if !e.retryable {
                        return Err(InfrastructureError::Sms(format!("Invalid request: {}", e.message)));
                    }

                    if attempts >= self.config.max_retries {
                        return Err(InfrastructureError::Sms(format!(
                            "Failed to send SMS after {} attempts: {}",
                            attempts, e.message
                        )));
                    }

                    warn!("Retryable Twilio failure, backing off for {:?}", delay);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl NotificationTransport for TwilioSmsService {
    async fn send(
        &self,
        phone: &str,
        message: &str,
        order_id: Option<&OrderId>,
    ) -> Result<String, NotificationError> {
        let normalized_phone = self.validate_phone_number(phone)?;

        info!(
            order_id = order_id.map(|id| id.as_str()).unwrap_or("-"),
            "Sending SMS to {} via Twilio (message length: {} chars)",
            mask_phone_number(&normalized_phone),
            message.chars().count()
        );

        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(NotificationError::Transport {
                message: format!("Message exceeds maximum length of {} characters", MAX_MESSAGE_LENGTH),
            });
        }

        Ok(self.send_with_retry(&normalized_phone, message).await?)
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}
