//! OTP record storage configuration module

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{env_or, env_string_or};

/// Storage backend for OTP records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory only
    #[default]
    Memory,
    /// JSON document on the local filesystem
    File,
    /// JSON document in Redis
    Redis,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" | "json" => Ok(StorageBackend::File),
            "redis" => Ok(StorageBackend::Redis),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Selected backend
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path of the JSON file used by the file backend
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Redis key holding the record document
    #[serde(default = "default_redis_key")]
    pub redis_key: String,

    /// Connect, read and write timeout for Redis calls
    #[serde(default = "default_redis_timeout_ms")]
    pub redis_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            file_path: default_file_path(),
            redis_url: default_redis_url(),
            redis_key: default_redis_key(),
            redis_timeout_ms: default_redis_timeout_ms(),
        }
    }
}

impl StorageConfig {
    /// Load from `OTP_STORE_*` and `REDIS_URL` environment variables
    pub fn from_env() -> Self {
        Self {
            backend: env_or("OTP_STORE_BACKEND", StorageBackend::Memory),
            file_path: PathBuf::from(env_string_or("OTP_STORE_PATH", "data/otp_records.json")),
            redis_url: env_string_or("REDIS_URL", &default_redis_url()),
            redis_key: env_string_or("OTP_STORE_REDIS_KEY", &default_redis_key()),
            redis_timeout_ms: env_or("OTP_STORE_REDIS_TIMEOUT_MS", default_redis_timeout_ms()).max(1),
        }
    }
}

fn default_file_path() -> PathBuf {
    PathBuf::from("data/otp_records.json")
}

fn default_redis_url() -> String {
    String::from("redis://127.0.0.1:6379")
}

fn default_redis_key() -> String {
    String::from("bmb:otp_records")
}

fn default_redis_timeout_ms() -> u64 {
    2000
}
