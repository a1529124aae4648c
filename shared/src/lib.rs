//! Shared utilities and common types for Bite Me Buddy services
//!
//! This crate provides functionality used across the workspace:
//! - Configuration types loaded from the environment
//! - Phone number utilities (normalisation, validation, masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, LogFormat, LoggingConfig,
    NotificationConfig, OtpSettings, SmsProvider, StorageBackend, StorageConfig,
};
pub use utils::phone;
