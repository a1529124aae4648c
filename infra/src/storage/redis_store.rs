//! Redis record store
//!
//! Keeps the record set as a single JSON string under one key. No TTL is set
//! on the key; expiry is handled by the lifecycle manager's sweep.
//!
//! Calls are synchronous and run under the manager's record lock, so every
//! connection is bounded by the configured timeout on connect, read and write.

use std::time::Duration;

use redis::{Client, Commands, Connection};
use tracing::{debug, error};

use bmb_core::errors::DomainResult;
use bmb_core::repositories::{OtpRecordMap, OtpStore};

use crate::InfrastructureError;

/// Default key holding the record document
pub const DEFAULT_RECORDS_KEY: &str = "bmb:otp_records";

/// Default bound on a single Redis call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct RedisOtpStore {
    client: Client,
    key: String,
    timeout: Duration,
}

impl RedisOtpStore {
    /// Create a store for `redis_url`. Connections are opened per call.
    pub fn new(redis_url: &str, key: &str, timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = Client::open(redis_url)?;
        let key = if key.is_empty() { DEFAULT_RECORDS_KEY } else { key };
        let timeout = if timeout.is_zero() { DEFAULT_TIMEOUT } else { timeout };

        Ok(Self {
            client,
            key: key.to_string(),
            timeout,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn connect(&self) -> Result<Connection, InfrastructureError> {
        let conn = self.client.get_connection_with_timeout(self.timeout)?;
        conn.set_read_timeout(Some(self.timeout))?;
        conn.set_write_timeout(Some(self.timeout))?;
        Ok(conn)
    }

    fn read(&self) -> Result<OtpRecordMap, InfrastructureError> {
        let mut conn = self.connect()?;
        let raw: Option<String> = conn.get(&self.key)?;

        match raw {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(OtpRecordMap::new()),
        }
    }

    fn write(&self, records: &OtpRecordMap) -> Result<(), InfrastructureError> {
        let json = serde_json::to_string(records)?;
        let mut conn = self.connect()?;
        conn.set::<_, _, ()>(&self.key, json)?;

        debug!(key = %self.key, records = records.len(), "OTP records written to Redis");
        Ok(())
    }
}

impl OtpStore for RedisOtpStore {
    fn load_all(&self) -> DomainResult<OtpRecordMap> {
        self.read().map_err(|e| {
            error!(key = %self.key, "Failed to load OTP records from Redis: {}", e);
            e.into()
        })
    }

    fn save_all(&self, records: &OtpRecordMap) -> DomainResult<()> {
        self.write(records).map_err(|e| {
            error!(key = %self.key, "Failed to save OTP records to Redis: {}", e);
            e.into()
        })
    }
}
