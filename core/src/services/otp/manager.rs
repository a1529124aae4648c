//! OTP lifecycle manager

use std::sync::{Arc, Mutex, MutexGuard};

use bmb_shared::phone::mask_phone_number;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{OrderId, OtpRecord};
use crate::domain::value_objects::{
    OtpStatistics, OtpStatus, ResendOutcome, SweepReport, VerifyOutcome,
};
use crate::errors::{DomainResult, OtpError};
use crate::repositories::{OtpRecordMap, OtpStore};
use crate::services::notification::{NotificationMessage, NotificationSink, OutboundNotification};

use super::clock::{Clock, SystemClock};
use super::code;
use super::config::OtpManagerConfig;

/// Owns every delivery OTP record, keyed by order.
///
/// All operations are synchronous. The record map stays locked for the whole
/// of each operation, including the write-back to the store, so a
/// check/increment/compare/persist sequence is never interleaved with another
/// operation on the same map. Notifications are only submitted to the sink,
/// never awaited.
pub struct OtpLifecycleManager {
    records: Mutex<OtpRecordMap>,
    store: Arc<dyn OtpStore>,
    notifier: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
    config: OtpManagerConfig,
}

impl OtpLifecycleManager {
    /// Create a manager on the wall clock, loading existing records from `store`
    ///
    /// # Arguments
    ///
    /// * `store` - Persistence for the record set
    /// * `notifier` - Where generated codes are submitted for delivery
    /// * `config` - TTL, attempt budget and grace window
    pub fn new(
        store: Arc<dyn OtpStore>,
        notifier: Arc<dyn NotificationSink>,
        config: OtpManagerConfig,
    ) -> DomainResult<Self> {
        Self::with_clock(store, notifier, Arc::new(SystemClock), config)
    }

    /// Create a manager with an explicit time source
    pub fn with_clock(
        store: Arc<dyn OtpStore>,
        notifier: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
        config: OtpManagerConfig,
    ) -> DomainResult<Self> {
        let records = store.load_all()?;
        info!(
            records = records.len(),
            ttl_seconds = config.ttl.num_seconds(),
            max_attempts = config.max_attempts,
            "OTP lifecycle manager initialised"
        );

        Ok(Self {
            records: Mutex::new(records),
            store,
            notifier,
            clock,
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &OtpManagerConfig {
        &self.config
    }

    /// Generate a fresh code for `order_id` and send it to `phone`.
    ///
    /// Any existing record for the order is replaced. Delivery is
    /// best-effort: a failed submission is logged and the record is kept.
    pub fn generate(&self, order_id: impl Into<OrderId>, phone: &str) -> String {
        let order_id = order_id.into();

        let code = {
            let mut records = self.lock();
            let code = self.issue(&mut records, order_id.clone(), phone.to_string());
            self.persist(&records, "generate");
            code
        };

        self.notify(&order_id, phone, &code);
        code
    }

    /// Check `input_code` against the record for `order_id`.
    ///
    /// In order: missing record, expiry (which deletes the record), exhausted
    /// attempts (no attempt consumed), then one attempt is consumed and the
    /// code compared.
    pub fn verify(&self, order_id: impl Into<OrderId>, input_code: &str) -> VerifyOutcome {
        let order_id = order_id.into();
        let now = self.clock.now();
        let max_attempts = self.config.max_attempts;
        let mut records = self.lock();

        let (expired, exhausted) = match records.get(&order_id) {
            Some(record) => (record.is_expired_at(now), record.is_exhausted(max_attempts)),
            None => {
                warn!(order_id = %order_id, event = "otp_not_found", "No OTP for order");
                return VerifyOutcome::failed(OtpError::NotFound);
            }
        };

        if expired {
            records.remove(&order_id);
            self.persist(&records, "verify");
            warn!(order_id = %order_id, event = "otp_expired", "OTP expired, record removed");
            return VerifyOutcome::failed(OtpError::Expired);
        }

        if exhausted {
            warn!(
                order_id = %order_id,
                event = "max_attempts_exceeded",
                "OTP verification rejected, attempts exhausted"
            );
            return VerifyOutcome::failed(OtpError::AttemptsExhausted);
        }

        let outcome = match records.get_mut(&order_id) {
            Some(record) => {
                record.record_attempt();
                if code::code_matches(record, input_code) {
                    record.mark_verified(now);
                    VerifyOutcome::verified(max_attempts)
                } else {
                    VerifyOutcome::failed(OtpError::Mismatch {
                        remaining: record.remaining_attempts(max_attempts),
                    })
                }
            }
            None => VerifyOutcome::failed(OtpError::NotFound),
        };
        self.persist(&records, "verify");

        if outcome.success {
            info!(order_id = %order_id, event = "otp_verified_success", "OTP verified");
        } else {
            warn!(
                order_id = %order_id,
                remaining_attempts = outcome.remaining_attempts,
                event = "otp_verification_failed",
                "OTP mismatch"
            );
        }
        outcome
    }

    /// Read-only view of the record for `order_id`; never deletes
    pub fn check_status(&self, order_id: impl Into<OrderId>) -> OtpStatus {
        let order_id = order_id.into();
        let now = self.clock.now();
        let records = self.lock();

        match records.get(&order_id) {
            Some(record) => {
                let time_remaining_seconds = record.time_remaining_at(now).num_seconds().max(0);
                OtpStatus {
                    exists: true,
                    verified: record.verified,
                    expired: time_remaining_seconds == 0,
                    attempts: record.attempts,
                    remaining_attempts: record.remaining_attempts(self.config.max_attempts),
                    time_remaining_seconds,
                }
            }
            None => OtpStatus::missing(),
        }
    }

    /// Regenerate the code for an existing record, reusing its phone number.
    ///
    /// Works on expired or exhausted records too; fails only when there is
    /// no record to take the phone number from.
    pub fn resend(&self, order_id: impl Into<OrderId>) -> ResendOutcome {
        let order_id = order_id.into();

        let (code, phone) = {
            let mut records = self.lock();
            let phone = match records.get(&order_id) {
                Some(record) => record.phone.clone(),
                None => {
                    warn!(order_id = %order_id, event = "otp_resend_unavailable", "Nothing to resend");
                    return ResendOutcome::unavailable();
                }
            };
            let code = self.issue(&mut records, order_id.clone(), phone.clone());
            self.persist(&records, "resend");
            (code, phone)
        };

        info!(order_id = %order_id, event = "otp_resent", "OTP regenerated for resend");
        self.notify(&order_id, &phone, &code);
        ResendOutcome::resent(code)
    }

    /// Delete every record past expiry plus the grace window
    pub fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let grace = self.config.grace;
        let mut records = self.lock();

        let before = records.len();
        records.retain(|_, record| !record.is_purgeable_at(now, grace));
        let removed = before - records.len();

        if removed > 0 {
            self.persist(&records, "sweep");
            info!(removed, remaining = records.len(), event = "otp_sweep", "Purged stale OTP records");
        } else {
            debug!(remaining = records.len(), "OTP sweep found nothing to purge");
        }

        SweepReport {
            removed,
            remaining: records.len(),
        }
    }

    /// Aggregate counts over the current records
    pub fn statistics(&self) -> OtpStatistics {
        let now = self.clock.now();
        let records = self.lock();

        let total = records.len();
        let verified = records.values().filter(|r| r.verified).count();
        let expired = records
            .values()
            .filter(|r| !r.verified && r.expires_at < now)
            .count();
        let active = total.saturating_sub(verified + expired);
        let success_rate = if total == 0 {
            0.0
        } else {
            verified as f64 / total as f64 * 100.0
        };

        OtpStatistics {
            total,
            verified,
            expired,
            active,
            success_rate,
        }
    }

    /// Replace the record for `order_id` with a fresh one, returning the plaintext code
    fn issue(&self, records: &mut OtpRecordMap, order_id: OrderId, phone: String) -> String {
        let now = self.clock.now();
        let code = code::generate_code();
        let salt = code::generate_salt();
        let code_hash = code::hash_code(&code, &salt);

        let record = OtpRecord::new(order_id.clone(), phone, code_hash, salt, now, self.config.ttl);
        info!(
            order_id = %order_id,
            phone = %mask_phone_number(&record.phone),
            expires_at = %record.expires_at,
            replaced = records.contains_key(&order_id),
            event = "otp_generated",
            "Generated delivery OTP"
        );
        records.insert(order_id, record);
        code
    }

    fn notify(&self, order_id: &OrderId, phone: &str, code: &str) {
        let message = NotificationMessage::DeliveryOtp {
            order_id: Some(order_id.clone()),
            code: code.to_string(),
            valid_minutes: self.config.ttl.num_minutes(),
        };

        if let Err(e) = self.notifier.submit(OutboundNotification::new(phone, &message)) {
            warn!(
                order_id = %order_id,
                phone = %mask_phone_number(phone),
                error = %e,
                event = "otp_notification_not_queued",
                "OTP notification could not be queued"
            );
        }
    }

    /// Write the full set back; the in-memory map stays authoritative on failure
    fn persist(&self, records: &OtpRecordMap, operation: &'static str) {
        if let Err(e) = self.store.save_all(records) {
            error!(
                operation,
                error = %e,
                event = "otp_persist_failed",
                "Failed to persist OTP records"
            );
        }
    }

    fn lock(&self) -> MutexGuard<'_, OtpRecordMap> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
