pub mod otp;

pub use otp::{InMemoryOtpStore, OtpRecordMap, OtpStore};
