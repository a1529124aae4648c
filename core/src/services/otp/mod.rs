//! Delivery OTP lifecycle module
//!
//! Covers the whole life of a delivery confirmation code:
//! - Generation and notification of a 4-digit code per order
//! - Verification with attempt tracking and expiry
//! - Resend (full regeneration using the stored phone number)
//! - Periodic purge of records past their grace window
//! - Read-only status and aggregate statistics

mod clock;
mod code;
mod config;
mod manager;
mod sweeper;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use code::{CODE_LENGTH, CODE_MAX, CODE_MIN};
pub use config::{
    OtpManagerConfig, SweepConfig, DEFAULT_EXPIRATION_MINUTES, DEFAULT_GRACE_MINUTES,
    MAX_ATTEMPTS,
};
pub use manager::OtpLifecycleManager;
pub use sweeper::OtpSweeper;
