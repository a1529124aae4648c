//! In-memory implementation of OtpStore

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::{DomainError, DomainResult};

use super::r#trait::{OtpRecordMap, OtpStore};

/// Process-local OTP store.
///
/// Used when no durable backend is configured and as the fake in tests.
#[derive(Default)]
pub struct InMemoryOtpStore {
    records: Mutex<OtpRecordMap>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryOtpStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`
    pub fn with_records(records: OtpRecordMap) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Number of successful `save_all` calls
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Make subsequent saves fail (for exercising error paths)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Copy of the currently persisted set
    pub fn snapshot(&self) -> OtpRecordMap {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl OtpStore for InMemoryOtpStore {
    fn load_all(&self) -> DomainResult<OtpRecordMap> {
        Ok(self.snapshot())
    }

    fn save_all(&self, records: &OtpRecordMap) -> DomainResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::Storage {
                message: "in-memory store configured to fail".to_string(),
            });
        }

        let mut stored = self
            .records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *stored = records.clone();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{OrderId, OtpRecord};
    use chrono::{Duration, Utc};

    fn sample_map() -> OtpRecordMap {
        let record = OtpRecord::new(
            OrderId::from(1u64),
            "+919876543210".to_string(),
            "hash".to_string(),
            "salt".to_string(),
            Utc::now(),
            Duration::minutes(5),
        );
        let mut map = OtpRecordMap::new();
        map.insert(record.order_id.clone(), record);
        map
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = InMemoryOtpStore::new();
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_set() {
        let store = InMemoryOtpStore::new();
        store.save_all(&sample_map()).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);

        store.save_all(&OtpRecordMap::new()).unwrap();
        assert!(store.load_all().unwrap().is_empty());
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn test_failing_saves() {
        let store = InMemoryOtpStore::new();
        store.set_fail_saves(true);

        let result = store.save_all(&sample_map());
        assert!(matches!(result, Err(DomainError::Storage { .. })));
        assert_eq!(store.save_count(), 0);
        assert!(store.snapshot().is_empty());
    }
}
