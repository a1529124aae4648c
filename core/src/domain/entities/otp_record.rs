//! Delivery OTP record entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the order an OTP confirms.
///
/// Orders are numbered in the ordering backend, but callers may also hand
/// over opaque string identifiers, so the id is kept as its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for OrderId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One delivery OTP, keyed by order.
///
/// The plaintext code never lives in the record; only a salted SHA-256
/// digest of it is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Order this OTP confirms
    pub order_id: OrderId,

    /// Hex SHA-256 of `salt || code`
    pub code_hash: String,

    /// Per-record random salt (hex)
    pub salt: String,

    /// Phone number the code was sent to
    pub phone: String,

    /// Verification tries consumed so far
    pub attempts: u32,

    /// When the code was generated
    pub generated_at: DateTime<Utc>,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,

    /// Set once a matching code has been accepted
    pub verified: bool,

    /// When the matching code was accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl OtpRecord {
    /// Creates a fresh, unverified record valid for `ttl` from `now`
    pub fn new(
        order_id: OrderId,
        phone: String,
        code_hash: String,
        salt: String,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            order_id,
            code_hash,
            salt,
            phone,
            attempts: 0,
            generated_at: now,
            expires_at: now + ttl,
            verified: false,
            verified_at: None,
        }
    }

    /// Strictly past its expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Strictly past expiry plus the retention grace window
    pub fn is_purgeable_at(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        now > self.expires_at + grace
    }

    /// Whether the attempt budget is used up
    pub fn is_exhausted(&self, max_attempts: u32) -> bool {
        self.attempts >= max_attempts
    }

    /// Attempts still available (0 once exhausted)
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Time left before expiry, clamped to zero
    pub fn time_remaining_at(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Consume one attempt
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Mark as verified; the first verification instant is kept
    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        if !self.verified {
            self.verified = true;
            self.verified_at = Some(now);
        }
    }
}
