//! Traits for notification delivery

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::OrderId;
use crate::errors::NotificationError;

use super::templates::NotificationMessage;

/// A rendered message waiting to be delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundNotification {
    /// Correlates the submission with its delivery event
    pub id: Uuid,
    /// Recipient phone number
    pub phone: String,
    /// Order the message is about, if any
    pub order_id: Option<OrderId>,
    /// Rendered message body
    pub body: String,
}

impl OutboundNotification {
    /// Render `message` for delivery to `phone`
    pub fn new(phone: impl Into<String>, message: &NotificationMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone: phone.into(),
            order_id: message.order_id().cloned(),
            body: message.to_string(),
        }
    }
}

/// Transport that actually delivers a message (SMS provider, simulator, ...)
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Deliver `message` to `phone`.
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier of the sent message
    /// * `Err(NotificationError)` - If delivery failed
    async fn send(
        &self,
        phone: &str,
        message: &str,
        order_id: Option<&OrderId>,
    ) -> Result<String, NotificationError>;

    /// Name of the provider behind this transport
    fn provider_name(&self) -> &str;
}

/// Non-blocking submission point used by the OTP lifecycle
pub trait NotificationSink: Send + Sync {
    /// Queue a notification without waiting for delivery.
    ///
    /// Returns the submission id, or why the notification could not even be queued.
    fn submit(&self, notification: OutboundNotification) -> Result<Uuid, NotificationError>;
}
