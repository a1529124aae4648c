//! Business services containing domain logic and use cases.

pub mod notification;
pub mod otp;

// Re-export commonly used types
pub use notification::{
    NotificationDispatcher, NotificationEvent, NotificationMessage, NotificationSink,
    NotificationTransport, OutboundNotification,
};
pub use otp::{
    Clock, ManualClock, OtpLifecycleManager, OtpManagerConfig, OtpSweeper, SweepConfig,
    SystemClock,
};
