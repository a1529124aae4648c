//! Unit tests for the OTP lifecycle manager

use std::sync::Arc;
use std::thread;

use chrono::Duration;

use crate::domain::entities::OrderId;
use crate::errors::OtpError;
use crate::repositories::{InMemoryOtpStore, OtpStore};
use crate::services::otp::{
    ManualClock, OtpLifecycleManager, OtpManagerConfig, CODE_LENGTH, CODE_MAX, CODE_MIN,
    MAX_ATTEMPTS,
};

use super::mocks::{harness, harness_with, start_time, wrong_code, RecordingSink};

const PHONE: &str = "9876543210";

#[test]
fn test_generate_returns_code_and_notifies() {
    let h = harness();

    let code = h.manager.generate(1042u64, PHONE);

    assert_eq!(code.len(), CODE_LENGTH);
    let num: u32 = code.parse().unwrap();
    assert!((CODE_MIN..=CODE_MAX).contains(&num));

    let notification = h.sink.last().expect("notification submitted");
    assert_eq!(notification.phone, PHONE);
    assert_eq!(notification.order_id, Some(OrderId::from(1042u64)));
    assert_eq!(
        notification.body,
        format!(
            "Your Bite Me Buddy order #1042 is out for delivery. OTP: {}. Valid for 5 minutes.",
            code
        )
    );
    assert_eq!(h.store.save_count(), 1);
}

#[test]
fn test_generated_code_is_not_stored_in_plaintext() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);

    let stored = h.store.snapshot();
    let record = stored.get(&OrderId::from(1)).unwrap();
    assert_ne!(record.code_hash, code);
    assert!(!serde_json::to_string(record).unwrap().contains(&format!("\"{}\"", code)));
}

#[test]
fn test_generate_replaces_existing_record() {
    let h = harness();
    let first = h.manager.generate(7, PHONE);
    h.manager.verify(7, &wrong_code(&first));
    assert_eq!(h.manager.check_status(7).attempts, 1);

    h.clock.advance(Duration::seconds(30));
    let second = h.manager.generate(7, "9123456780");

    let status = h.manager.check_status(7);
    assert_eq!(status.attempts, 0);
    assert_eq!(status.time_remaining_seconds, 300);

    let stored = h.store.snapshot();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[&OrderId::from(7)].phone, "9123456780");

    if first != second {
        assert!(!h.manager.verify(7, &first).success);
    }
    assert!(h.manager.verify(7, &second).success);
}

#[test]
fn test_verify_correct_code_first_attempt() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);

    let outcome = h.manager.verify(1, &code);

    assert!(outcome.success);
    assert_eq!(outcome.remaining_attempts, MAX_ATTEMPTS);
    assert!(outcome.failure.is_none());

    let status = h.manager.check_status(1);
    assert!(status.verified);
    assert_eq!(status.attempts, 1);

    let stored = h.store.snapshot();
    assert_eq!(stored[&OrderId::from(1)].verified_at, Some(start_time()));
}

#[test]
fn test_verify_mismatch_counts_down() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);
    let wrong = wrong_code(&code);

    let first = h.manager.verify(1, &wrong);
    assert!(!first.success);
    assert_eq!(first.remaining_attempts, 2);
    assert_eq!(first.message, "Invalid OTP. 2 attempts remaining.");

    let second = h.manager.verify(1, &wrong);
    assert_eq!(second.remaining_attempts, 1);
    assert_eq!(second.message, "Invalid OTP. 1 attempt remaining.");

    let third = h.manager.verify(1, &wrong);
    assert_eq!(third.remaining_attempts, 0);
    assert_eq!(third.failure, Some(OtpError::Mismatch { remaining: 0 }));
}

#[test]
fn test_exhausted_attempts_reject_correct_code() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);
    for _ in 0..MAX_ATTEMPTS {
        h.manager.verify(1, &wrong_code(&code));
    }
    let saves_before = h.store.save_count();

    let outcome = h.manager.verify(1, &code);

    assert!(!outcome.success);
    assert_eq!(outcome.failure, Some(OtpError::AttemptsExhausted));
    assert_eq!(outcome.remaining_attempts, 0);
    assert!(outcome.message.contains("Maximum attempts exceeded"));

    // rejected without consuming an attempt or touching the store
    assert_eq!(h.manager.check_status(1).attempts, MAX_ATTEMPTS);
    assert_eq!(h.store.save_count(), saves_before);
    // exhaustion alone never deletes
    assert!(h.manager.check_status(1).exists);
}

#[test]
fn test_verify_unknown_order() {
    let h = harness();

    let outcome = h.manager.verify("missing", "1234");

    assert!(!outcome.success);
    assert_eq!(outcome.failure, Some(OtpError::NotFound));
    assert_eq!(outcome.remaining_attempts, 0);
    assert!(outcome.message.contains("not found or expired"));
    assert_eq!(h.store.save_count(), 0);
}

#[test]
fn test_verify_after_expiry_deletes_record() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);

    h.clock.advance(Duration::minutes(5) + Duration::seconds(1));
    let outcome = h.manager.verify(1, &code);

    assert!(!outcome.success);
    assert_eq!(outcome.failure, Some(OtpError::Expired));
    assert!(outcome.message.contains("expired"));
    assert_eq!(outcome.remaining_attempts, 0);

    assert!(!h.manager.check_status(1).exists);
    assert!(h.store.snapshot().is_empty());
}

#[test]
fn test_verify_at_exact_expiry_still_accepted() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);

    h.clock.advance(Duration::minutes(5));

    assert!(h.manager.verify(1, &code).success);
}

#[test]
fn test_check_status_fresh_record() {
    let h = harness();
    h.manager.generate(1, PHONE);

    let status = h.manager.check_status(1);

    assert!(status.exists);
    assert!(!status.verified);
    assert!(!status.expired);
    assert_eq!(status.attempts, 0);
    assert_eq!(status.remaining_attempts, MAX_ATTEMPTS);
    assert_eq!(status.time_remaining_seconds, 300);

    h.clock.advance(Duration::seconds(90));
    assert_eq!(h.manager.check_status(1).time_remaining_seconds, 210);
}

#[test]
fn test_check_status_missing_record() {
    let h = harness();

    let status = h.manager.check_status(99);

    assert!(!status.exists);
    assert!(status.expired);
    assert_eq!(status.attempts, 0);
}

#[test]
fn test_check_status_never_deletes() {
    let h = harness();
    h.manager.generate(1, PHONE);
    let saves_before = h.store.save_count();

    h.clock.advance(Duration::minutes(6));
    let status = h.manager.check_status(1);

    assert!(status.exists);
    assert!(status.expired);
    assert_eq!(status.time_remaining_seconds, 0);
    assert!(h.manager.check_status(1).exists);
    assert_eq!(h.store.save_count(), saves_before);
}

#[test]
fn test_resend_without_record_fails() {
    let h = harness();

    let outcome = h.manager.resend(5);

    assert!(!outcome.success);
    assert!(outcome.code.is_none());
    assert_eq!(outcome.failure, Some(OtpError::NotFound));
    assert!(outcome.message.contains("cannot be resent"));
    assert_eq!(h.sink.count(), 0);
}

#[test]
fn test_resend_regenerates_for_same_phone() {
    let h = harness();
    let original = h.manager.generate(5, PHONE);
    h.manager.verify(5, &wrong_code(&original));
    h.manager.verify(5, &wrong_code(&original));
    let before = h.store.snapshot()[&OrderId::from(5)].clone();

    h.clock.advance(Duration::seconds(45));
    let outcome = h.manager.resend(5);

    assert!(outcome.success);
    let code = outcome.code.expect("new code returned");
    let after = h.store.snapshot()[&OrderId::from(5)].clone();
    assert_eq!(after.phone, PHONE);
    assert_eq!(after.attempts, 0);
    assert!(after.generated_at > before.generated_at);
    assert_ne!(after.salt, before.salt);

    assert_eq!(h.sink.count(), 2);
    assert_eq!(h.sink.last().unwrap().phone, PHONE);
    assert!(h.manager.verify(5, &code).success);
}

#[test]
fn test_resend_recovers_expired_and_exhausted_records() {
    let h = harness();
    let code = h.manager.generate(5, PHONE);
    for _ in 0..MAX_ATTEMPTS {
        h.manager.verify(5, &wrong_code(&code));
    }
    h.clock.advance(Duration::minutes(7));

    let outcome = h.manager.resend(5);
    assert!(outcome.success);

    let status = h.manager.check_status(5);
    assert!(!status.expired);
    assert_eq!(status.attempts, 0);
    assert!(h.manager.verify(5, &outcome.code.unwrap()).success);
}

#[test]
fn test_resend_resets_verified_flag() {
    let h = harness();
    let code = h.manager.generate(5, PHONE);
    assert!(h.manager.verify(5, &code).success);

    h.manager.resend(5);

    assert!(!h.manager.check_status(5).verified);
}

#[test]
fn test_verified_flag_is_monotonic() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);
    assert!(h.manager.verify(1, &code).success);

    h.clock.advance(Duration::seconds(5));
    h.manager.verify(1, &wrong_code(&code));

    let stored = h.store.snapshot();
    let record = &stored[&OrderId::from(1)];
    assert!(record.verified);
    assert_eq!(record.verified_at, Some(start_time()));
}

#[test]
fn test_sweep_is_idempotent_without_time_advance() {
    let h = harness();
    h.manager.generate(1, PHONE);
    h.manager.generate(2, PHONE);

    for _ in 0..3 {
        let report = h.manager.sweep();
        assert_eq!(report.removed, 0);
        assert_eq!(report.remaining, 2);
    }
    assert_eq!(h.store.save_count(), 2);
}

#[test]
fn test_sweep_respects_grace_window() {
    let h = harness();
    h.manager.generate(1, PHONE);

    h.clock.advance(Duration::minutes(10));
    assert_eq!(h.manager.sweep().removed, 0);
    assert!(h.manager.check_status(1).exists);

    h.clock.advance(Duration::seconds(1));
    let report = h.manager.sweep();
    assert_eq!(report.removed, 1);
    assert_eq!(report.remaining, 0);
    assert!(h.store.snapshot().is_empty());
}

#[test]
fn test_sweep_removes_verified_records_too() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);
    assert!(h.manager.verify(1, &code).success);
    h.clock.advance(Duration::minutes(10) + Duration::seconds(1));

    assert_eq!(h.manager.sweep().removed, 1);
}

#[test]
fn test_statistics_empty() {
    let h = harness();

    let stats = h.manager.statistics();

    assert_eq!(stats.total, 0);
    assert_eq!(stats.active, 0);
    assert_eq!(stats.success_rate, 0.0);
}

#[test]
fn test_statistics_mixed_records() {
    let h = harness();
    h.manager.generate(1, PHONE);
    h.clock.advance(Duration::minutes(6));
    let code = h.manager.generate(2, PHONE);
    assert!(h.manager.verify(2, &code).success);

    let stats = h.manager.statistics();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.verified, 1);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.active, 0);
    assert_eq!(stats.success_rate, 50.0);
}

#[test]
fn test_statistics_verified_record_past_expiry_is_not_expired() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);
    assert!(h.manager.verify(1, &code).success);
    h.manager.generate(2, PHONE);
    h.clock.advance(Duration::minutes(6));

    let stats = h.manager.statistics();

    assert_eq!(stats.total, 2);
    assert_eq!(stats.verified, 1);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.active, 0);
    assert_eq!(stats.verified + stats.expired + stats.active, stats.total);
}

#[test]
fn test_statistics_active_records() {
    let h = harness();
    h.manager.generate(1, PHONE);
    h.manager.generate(2, PHONE);
    h.manager.generate(3, PHONE);

    let stats = h.manager.statistics();

    assert_eq!(stats.active, 3);
    assert_eq!(stats.expired, 0);
}

#[test]
fn test_persistence_failure_does_not_break_operations() {
    let store = Arc::new(InMemoryOtpStore::new());
    store.set_fail_saves(true);
    let h = harness_with(store, Arc::new(RecordingSink::new(false)));

    let code = h.manager.generate(1, PHONE);
    assert!(h.manager.check_status(1).exists);
    assert!(h.manager.verify(1, &code).success);
    assert!(h.store.snapshot().is_empty());
}

#[test]
fn test_notification_failure_does_not_roll_back_generate() {
    let h = harness_with(Arc::new(InMemoryOtpStore::new()), Arc::new(RecordingSink::new(true)));

    let code = h.manager.generate(1, PHONE);

    assert!(h.manager.check_status(1).exists);
    assert!(h.manager.verify(1, &code).success);
}

#[test]
fn test_manager_restores_records_from_store() {
    let store = Arc::new(InMemoryOtpStore::new());
    let first = harness_with(store.clone(), Arc::new(RecordingSink::new(false)));
    let code = first.manager.generate(1, PHONE);
    first.manager.verify(1, &wrong_code(&code));

    let clock = Arc::new(ManualClock::new(start_time()));
    let restored = OtpLifecycleManager::with_clock(
        store.clone(),
        Arc::new(RecordingSink::new(false)),
        clock,
        OtpManagerConfig::default(),
    )
    .unwrap();

    assert_eq!(restored.check_status(1).attempts, 1);
    assert!(restored.verify(1, &code).success);
    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[test]
fn test_custom_config() {
    let config = OtpManagerConfig {
        ttl: Duration::minutes(2),
        max_attempts: 5,
        grace: Duration::minutes(1),
    };
    let clock = Arc::new(ManualClock::new(start_time()));
    let sink = Arc::new(RecordingSink::new(false));
    let manager = OtpLifecycleManager::with_clock(
        Arc::new(InMemoryOtpStore::new()),
        sink.clone(),
        clock.clone(),
        config,
    )
    .unwrap();

    let code = manager.generate(1, PHONE);
    assert_eq!(manager.check_status(1).time_remaining_seconds, 120);
    assert_eq!(manager.verify(1, &wrong_code(&code)).remaining_attempts, 4);
    assert!(sink.last().unwrap().body.ends_with("Valid for 2 minutes."));

    clock.advance(Duration::minutes(3) + Duration::seconds(1));
    assert_eq!(manager.sweep().removed, 1);
}

#[test]
fn test_concurrent_verifications_never_exceed_budget() {
    let h = harness();
    let code = h.manager.generate(1, PHONE);
    let wrong = wrong_code(&code);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let manager = h.manager.clone();
            let wrong = wrong.clone();
            thread::spawn(move || manager.verify(1, &wrong))
        })
        .collect();
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let mismatches = outcomes
        .iter()
        .filter(|o| matches!(o.failure, Some(OtpError::Mismatch { .. })))
        .count();
    let exhausted = outcomes
        .iter()
        .filter(|o| o.failure == Some(OtpError::AttemptsExhausted))
        .count();

    assert_eq!(mismatches, MAX_ATTEMPTS as usize);
    assert_eq!(exhausted, 8 - MAX_ATTEMPTS as usize);
    assert_eq!(h.manager.check_status(1).attempts, MAX_ATTEMPTS);
}
