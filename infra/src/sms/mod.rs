//! SMS Service Module
//!
//! Notification transports used by the dispatcher worker. Phone numbers are
//! normalised to E.164 before they reach a provider and masked in every log
//! line.

use std::sync::Arc;

use bmb_core::services::NotificationTransport;
use bmb_shared::config::{NotificationConfig, SmsProvider};

pub mod mock_sms;
pub mod twilio;

pub use mock_sms::{MockSmsService, SentSms};
pub use twilio::{TwilioConfig, TwilioSmsService};

#[cfg(test)]
mod tests;

/// Create the notification transport selected by configuration
///
/// Twilio without complete credentials falls back to the mock transport so a
/// misconfigured environment still boots.
pub fn create_notification_transport(config: &NotificationConfig) -> Arc<dyn NotificationTransport> {
    match config.provider {
        SmsProvider::Mock => Arc::new(MockSmsService::new(&config.default_country_code)),
        SmsProvider::Twilio => {
            if !config.has_twilio_credentials() {
                tracing::warn!("Twilio credentials incomplete, falling back to mock SMS service");
                return Arc::new(MockSmsService::new(&config.default_country_code));
            }

            match TwilioSmsService::new(TwilioConfig::from(config)) {
                Ok(service) => Arc::new(service),
                Err(e) => {
                    tracing::error!("Failed to initialize Twilio SMS service: {}", e);
                    tracing::warn!("Falling back to mock SMS service");
                    Arc::new(MockSmsService::new(&config.default_country_code))
                }
            }
        }
    }
}
