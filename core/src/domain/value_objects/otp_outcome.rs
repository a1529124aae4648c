//! Outcome and status types for OTP operations

use serde::{Deserialize, Serialize};

use crate::errors::OtpError;

/// Message returned when a verification succeeds
pub const VERIFIED_MESSAGE: &str = "OTP verified successfully.";

/// Message returned when a resend succeeds
pub const RESENT_MESSAGE: &str = "A new OTP has been sent.";

/// Message returned when there is nothing to resend
pub const RESEND_UNAVAILABLE_MESSAGE: &str =
    "No OTP exists for this order, so it cannot be resent. Please generate a new OTP.";

/// Result of a verification attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// Whether the code was accepted
    pub success: bool,
    /// Human readable message for display
    pub message: String,
    /// Attempts left on the record
    pub remaining_attempts: u32,
    /// Failure kind when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<OtpError>,
}

impl VerifyOutcome {
    pub(crate) fn verified(remaining_attempts: u32) -> Self {
        Self {
            success: true,
            message: VERIFIED_MESSAGE.to_string(),
            remaining_attempts,
            failure: None,
        }
    }

    pub(crate) fn failed(error: OtpError) -> Self {
        let remaining_attempts = match &error {
            OtpError::Mismatch { remaining } => *remaining,
            _ => 0,
        };
        Self {
            success: false,
            message: error.to_string(),
            remaining_attempts,
            failure: Some(error),
        }
    }
}

/// Read-only view of a record's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpStatus {
    pub exists: bool,
    pub verified: bool,
    pub expired: bool,
    pub attempts: u32,
    pub remaining_attempts: u32,
    pub time_remaining_seconds: i64,
}

impl OtpStatus {
    /// Status reported when no record exists for the order
    pub fn missing() -> Self {
        Self {
            exists: false,
            verified: false,
            expired: true,
            attempts: 0,
            remaining_attempts: 0,
            time_remaining_seconds: 0,
        }
    }
}

/// Result of a resend request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendOutcome {
    pub success: bool,
    pub message: String,
    /// The freshly generated code, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<OtpError>,
}

impl ResendOutcome {
    pub(crate) fn resent(code: String) -> Self {
        Self {
            success: true,
            message: RESENT_MESSAGE.to_string(),
            code: Some(code),
            failure: None,
        }
    }

    pub(crate) fn unavailable() -> Self {
        Self {
            success: false,
            message: RESEND_UNAVAILABLE_MESSAGE.to_string(),
            code: None,
            failure: Some(OtpError::NotFound),
        }
    }
}

/// Aggregate counts over all current records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtpStatistics {
    pub total: usize,
    pub verified: usize,
    /// Unverified records past their expiry.
    ///
    /// A verified record is counted under `verified` only, even once its
    /// expiry has passed, so `verified + expired + active == total`.
    pub expired: usize,
    /// Unverified records still inside their validity window
    pub active: usize,
    /// `verified / total * 100`, 0 for an empty set
    pub success_rate: f64,
}

/// Summary of one sweep pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Records deleted in this pass
    pub removed: usize,
    /// Records left after the pass
    pub remaining: usize,
}
