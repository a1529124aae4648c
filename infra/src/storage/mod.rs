//! OTP record stores
//!
//! Every backend keeps the whole record set as a single JSON document keyed by
//! order id, matching the load-all/save-all contract of [`OtpStore`].

use std::sync::Arc;
#[cfg(feature = "redis-cache")]
use std::time::Duration;

use bmb_core::repositories::{InMemoryOtpStore, OtpStore};
use bmb_shared::config::{StorageBackend, StorageConfig};

use crate::InfrastructureError;

pub mod json_file;
#[cfg(feature = "redis-cache")]
pub mod redis_store;

pub use json_file::JsonFileOtpStore;
#[cfg(feature = "redis-cache")]
pub use redis_store::RedisOtpStore;

/// Create the record store selected by configuration
pub fn create_otp_store(config: &StorageConfig) -> Result<Arc<dyn OtpStore>, InfrastructureError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory OTP store; records are lost on restart");
            Ok(Arc::new(InMemoryOtpStore::new()))
        }
        StorageBackend::File => Ok(Arc::new(JsonFileOtpStore::new(&config.file_path))),
        #[cfg(feature = "redis-cache")]
        StorageBackend::Redis => Ok(Arc::new(RedisOtpStore::new(
            &config.redis_url,
            &config.redis_key,
            Duration::from_millis(config.redis_timeout_ms),
        )?)),
        #[cfg(not(feature = "redis-cache"))]
        StorageBackend::Redis => Err(InfrastructureError::Config(
            "Redis storage requested but the `redis-cache` feature is disabled".to_string(),
        )),
    }
}
