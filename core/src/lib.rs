//! # Bite Me Buddy Core
//!
//! Domain layer for delivery confirmation OTPs.
//! This crate contains the OTP record entity, the lifecycle manager that
//! generates, verifies, resends and purges codes, the persistence and
//! notification ports it depends on, and the error types shared by the
//! infrastructure adapters.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience. `repositories` and
// `services` both have an `otp` module, so their items are listed explicitly.
pub use domain::*;
pub use errors::*;
pub use repositories::{InMemoryOtpStore, OtpRecordMap, OtpStore};
pub use services::{
    Clock, ManualClock, NotificationDispatcher, NotificationEvent, NotificationMessage,
    NotificationSink, NotificationTransport, OtpLifecycleManager, OtpManagerConfig, OtpSweeper,
    OutboundNotification, SweepConfig, SystemClock,
};
