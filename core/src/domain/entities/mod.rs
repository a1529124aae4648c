//! Domain entities representing core business objects.

pub mod otp_record;

pub use otp_record::{OrderId, OtpRecord};
