//! Mock SMS Service Implementation
//!
//! Logs messages instead of sending them. Used in development and tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use bmb_core::errors::NotificationError;
use bmb_core::services::NotificationTransport;
use bmb_core::OrderId;
use bmb_shared::utils::phone::{is_valid_international_phone, mask_phone_number, to_e164};

/// Number of recent messages kept for inspection
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A message accepted by the mock transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentSms {
    /// Normalised destination
    pub to: String,
    /// Message body
    pub body: String,
    /// Order the message belongs to
    pub order_id: Option<OrderId>,
    /// Mock provider identifier
    pub message_id: String,
}

/// Mock SMS service for development and testing
///
/// This implementation:
/// - Normalises and validates phone numbers
/// - Logs messages to the console
/// - Generates mock message IDs
/// - Keeps the most recent accepted messages for inspection
#[derive(Clone)]
pub struct MockSmsService {
    default_country_code: String,
    message_count: Arc<AtomicU64>,
    sent: Arc<Mutex<VecDeque<SentSms>>>,
    history_limit: usize,
    simulate_failure: Arc<AtomicBool>,
    console_output: bool,
    delay: Duration,
}

impl MockSmsService {
    /// Create a new mock SMS service
    pub fn new(default_country_code: &str) -> Self {
        Self {
            default_country_code: default_country_code.to_string(),
            message_count: Arc::new(AtomicU64::new(0)),
            sent: Arc::new(Mutex::new(VecDeque::new())),
            history_limit: DEFAULT_HISTORY_LIMIT,
            simulate_failure: Arc::new(AtomicBool::new(false)),
            console_output: true,
            delay: Duration::ZERO,
        }
    }

    /// Create a mock service with configurable options
    pub fn with_options(default_country_code: &str, console_output: bool, simulate_failure: bool) -> Self {
        let service = Self {
            console_output,
            ..Self::new(default_country_code)
        };
        service.set_simulate_failure(simulate_failure);
        service
    }

    /// Simulate network latency on every send
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Keep at most `limit` recent messages; 0 disables recording
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Most recent accepted messages, oldest first
    pub fn sent_messages(&self) -> Vec<SentSms> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Reset the message counter and the recorded messages
    pub fn reset(&self) {
        self.message_count.store(0, Ordering::SeqCst);
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

impl Default for MockSmsService {
    fn default() -> Self {
        Self::new("+91")
    }
}

#[async_trait]
impl NotificationTransport for MockSmsService {
    async fn send(
        &self,
        phone: &str,
        message: &str,
        order_id: Option<&OrderId>,
    ) -> Result<String, NotificationError> {
        let to = to_e164(phone, &self.default_country_code);
        let masked_phone = mask_phone_number(&to);

        if !is_valid_international_phone(&to) {
            return Err(NotificationError::InvalidPhone { phone: masked_phone });
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!("Mock SMS service simulating failure for phone: {}", masked_phone);
            return Err(NotificationError::Transport {
                message: "Simulated SMS sending failure".to_string(),
            });
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            println!("\n{}", "=".repeat(60));
            println!("MOCK SMS SERVICE - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", masked_phone);
            if let Some(order_id) = order_id {
                println!("Order: #{}", order_id);
            }
            println!("Message ID: {}", message_id);
            println!("Content: {}", message);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "sms_service",
            provider = "mock",
            phone = %masked_phone,
            message_id = %message_id,
            message_length = message.len(),
            "SMS sent successfully (mock)"
        );

        if self.history_limit > 0 {
            let mut sent = self
                .sent
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            while sent.len() >= self.history_limit {
                sent.pop_front();
            }
            sent.push_back(SentSms {
                to,
                body: message.to_string(),
                order_id: order_id.cloned(),
                message_id: message_id.clone(),
            });
        }

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
