//! Value objects returned to callers of the OTP lifecycle.

pub mod otp_outcome;

pub use otp_outcome::{OtpStatistics, OtpStatus, ResendOutcome, SweepReport, VerifyOutcome};
