//! Domain-specific error types and error handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Why an OTP operation did not succeed.
///
/// These are reported to callers inside outcome values rather than as `Err`,
/// so a UI can render the message without unwinding.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OtpError {
    #[error("OTP not found or expired. Please generate a new OTP.")]
    NotFound,

    #[error("OTP has expired. Please request a new OTP.")]
    Expired,

    #[error("Maximum attempts exceeded. Please request a new OTP.")]
    AttemptsExhausted,

    #[error("Invalid OTP. {remaining} {} remaining.", attempts_noun(.remaining))]
    Mismatch { remaining: u32 },
}

impl OtpError {
    /// Whether the caller can recover by simply trying again with the same record
    pub fn is_retryable(&self) -> bool {
        matches!(self, OtpError::Mismatch { remaining } if *remaining > 0)
    }
}

fn attempts_noun(remaining: &u32) -> &'static str {
    if *remaining == 1 {
        "attempt"
    } else {
        "attempts"
    }
}

/// Failures of the outbound notification path.
///
/// Never surfaced from OTP operations; only logged and published as events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("Invalid phone number: {phone}")]
    InvalidPhone { phone: String },

    #[error("Notification transport failed: {message}")]
    Transport { message: String },

    #[error("Notification queue is full")]
    QueueFull,

    #[error("Notification worker has shut down")]
    WorkerClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_message_is_pluralised() {
        assert_eq!(
            OtpError::Mismatch { remaining: 2 }.to_string(),
            "Invalid OTP. 2 attempts remaining."
        );
        assert_eq!(
            OtpError::Mismatch { remaining: 1 }.to_string(),
            "Invalid OTP. 1 attempt remaining."
        );
        assert_eq!(
            OtpError::Mismatch { remaining: 0 }.to_string(),
            "Invalid OTP. 0 attempts remaining."
        );
    }

    #[test]
    fn test_messages_mention_cause() {
        assert!(OtpError::NotFound.to_string().contains("not found or expired"));
        assert!(OtpError::Expired.to_string().contains("expired"));
        assert!(OtpError::AttemptsExhausted
            .to_string()
            .contains("Maximum attempts exceeded"));
    }

    #[test]
    fn test_retryable() {
        assert!(OtpError::Mismatch { remaining: 1 }.is_retryable());
        assert!(!OtpError::Mismatch { remaining: 0 }.is_retryable());
        assert!(!OtpError::Expired.is_retryable());
        assert!(!OtpError::AttemptsExhausted.is_retryable());
    }

    #[test]
    fn test_serialization_tag() {
        let json = serde_json::to_value(OtpError::Mismatch { remaining: 2 }).unwrap();
        assert_eq!(json["kind"], "mismatch");
        assert_eq!(json["remaining"], 2);
    }
}
