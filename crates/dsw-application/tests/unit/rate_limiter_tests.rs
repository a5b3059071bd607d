//! Tests for sliding-window admission

use crate::test_utils::{FakeRateLimitStore, ManualClock};
use dsw_application::use_cases::RateLimiter;
use dsw_domain::value_objects::{DenyReason, RateLimitConfig, RateLimitKey};
use std::sync::Arc;
use std::time::Duration;

const INTEGRATION: &str = "crm";
const ORG: &str = "agency-x:branch-1";

fn limiter(rows: Vec<(RateLimitKey, RateLimitConfig)>) -> (RateLimiter, Arc<FakeRateLimitStore>, Arc<ManualClock>) {
    let store = FakeRateLimitStore::with_rows(rows);
    let clock = ManualClock::new();
    let limiter = RateLimiter::new(store.clone(), clock.clone());
    (limiter, store, clock)
}

// ============================================================================
// Minute and Hour Windows
// ============================================================================

#[tokio::test]
async fn test_burst_allowance_then_minute_deny() {
    let (limiter, _, clock) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(5, 100, 2),
    )]);

    for i in 0..7 {
        let decision = limiter.admit(INTEGRATION, ORG).await;
        assert!(decision.allowed, "request {} should be admitted", i + 1);
        clock.advance(Duration::from_millis(100));
    }

    let denied = limiter.admit(INTEGRATION, ORG).await;
    assert!(!denied.allowed);
    assert_eq!(denied.reason, Some(DenyReason::MinuteLimitExceeded));
    assert!(denied.retry_after_secs.unwrap() > 0);
    assert_eq!(denied.limit, 7);
}

#[tokio::test]
async fn test_minute_window_slides() {
    let (limiter, _, clock) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(2, 100, 0),
    )]);

    assert!(limiter.admit(INTEGRATION, ORG).await.allowed);
    assert!(limiter.admit(INTEGRATION, ORG).await.allowed);
    assert!(!limiter.admit(INTEGRATION, ORG).await.allowed);

    clock.advance(Duration::from_secs(60));
    assert!(limiter.admit(INTEGRATION, ORG).await.allowed);
}

#[tokio::test]
async fn test_hour_limit_denies_with_hour_reason() {
    let (limiter, _, clock) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(10, 3, 0),
    )]);

    for _ in 0..3 {
        assert!(limiter.admit(INTEGRATION, ORG).await.allowed);
        clock.advance(Duration::from_secs(61));
    }

    let denied = limiter.admit(INTEGRATION, ORG).await;
    assert_eq!(denied.reason, Some(DenyReason::HourLimitExceeded));
    let retry_after = denied.retry_after_secs.unwrap();
    assert!(retry_after > 60 && retry_after <= 3600);

    clock.advance(Duration::from_secs(3600));
    assert!(limiter.admit(INTEGRATION, ORG).await.allowed);
}

#[tokio::test]
async fn test_remaining_counts_down() {
    let (limiter, _, _) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(5, 100, 2),
    )]);

    assert_eq!(limiter.admit(INTEGRATION, ORG).await.remaining, 4);
    assert_eq!(limiter.admit(INTEGRATION, ORG).await.remaining, 3);
}

#[tokio::test]
async fn test_buckets_are_isolated_per_organization() {
    let (limiter, _, _) = limiter(vec![(
        RateLimitKey::integration_default(INTEGRATION),
        RateLimitConfig::new(1, 100, 0),
    )]);

    assert!(limiter.admit(INTEGRATION, "agency-x:branch-1").await.allowed);
    assert!(!limiter.admit(INTEGRATION, "agency-x:branch-1").await.allowed);
    assert!(limiter.admit(INTEGRATION, "agency-x:branch-2").await.allowed);
}

// ============================================================================
// Configuration Resolution
// ============================================================================

#[tokio::test]
async fn test_missing_config_uses_defaults() {
    let (limiter, _, _) = limiter(Vec::new());

    let decision = limiter.admit(INTEGRATION, ORG).await;
    assert!(decision.allowed);
    assert_eq!(decision.limit, 70);
    assert_eq!(decision.diagnostic, None);
}

#[tokio::test]
async fn test_organization_row_beats_integration_default() {
    let (limiter, _, _) = limiter(vec![
        (
            RateLimitKey::integration_default(INTEGRATION),
            RateLimitConfig::new(100, 1000, 0),
        ),
        (RateLimitKey::new(INTEGRATION, ORG), RateLimitConfig::new(3, 1000, 0)),
    ]);

    let resolved = limiter
        .resolve_config(&RateLimitKey::new(INTEGRATION, ORG))
        .await
        .unwrap();
    assert_eq!(resolved.req_per_minute, 3);

    let other = limiter
        .resolve_config(&RateLimitKey::new(INTEGRATION, "agency-y:branch-9"))
        .await
        .unwrap();
    assert_eq!(other.req_per_minute, 100);
}

#[tokio::test]
async fn test_disabled_config_admits_everything() {
    let mut config = RateLimitConfig::new(1, 1, 0);
    config.enabled = false;
    let (limiter, _, _) = limiter(vec![(RateLimitKey::new(INTEGRATION, ORG), config)]);

    for _ in 0..10 {
        let decision = limiter.admit(INTEGRATION, ORG).await;
        assert!(decision.allowed);
        assert!(decision.headers().is_empty());
    }
}

#[tokio::test]
async fn test_config_is_cached_for_five_minutes() {
    let (limiter, store, clock) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(5, 100, 0),
    )]);

    limiter.admit(INTEGRATION, ORG).await;
    limiter.admit(INTEGRATION, ORG).await;
    assert_eq!(store.reads(), 1);

    clock.advance(Duration::from_secs(301));
    limiter.admit(INTEGRATION, ORG).await;
    assert_eq!(store.reads(), 2);
}

#[tokio::test]
async fn test_store_failure_fails_open() {
    let store = FakeRateLimitStore::unavailable();
    let limiter = RateLimiter::new(store, ManualClock::new());

    for _ in 0..100 {
        let decision = limiter.admit(INTEGRATION, ORG).await;
        assert!(decision.allowed);
        assert!(decision.reason.is_none());
        assert!(decision.diagnostic.is_some());
    }
}

// ============================================================================
// Administration
// ============================================================================

#[tokio::test]
async fn test_set_config_takes_effect_immediately() {
    let (limiter, store, _) = limiter(Vec::new());
    let key = RateLimitKey::new(INTEGRATION, ORG);

    assert_eq!(limiter.admit(INTEGRATION, ORG).await.limit, 70);

    limiter
        .set_config(&key, RateLimitConfig::new(1, 10, 0))
        .await
        .unwrap();
    assert!(store.row(&key).unwrap().last_updated.is_some());

    assert!(!limiter.admit(INTEGRATION, ORG).await.allowed);
}

#[tokio::test]
async fn test_remove_config_restores_defaults() {
    let key = RateLimitKey::new(INTEGRATION, ORG);
    let (limiter, _, _) = limiter(vec![(key.clone(), RateLimitConfig::new(1, 10, 0))]);

    assert_eq!(limiter.admit(INTEGRATION, ORG).await.limit, 1);
    assert!(limiter.remove_config(&key).await.unwrap());
    assert!(!limiter.remove_config(&key).await.unwrap());
    assert_eq!(limiter.admit(INTEGRATION, ORG).await.limit, 70);
}

#[tokio::test]
async fn test_usage_and_debounced_warning() {
    let (limiter, _, clock) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(10, 1000, 0),
    )]);

    for _ in 0..10 {
        limiter.admit(INTEGRATION, ORG).await;
    }
    let usage = limiter.usage(INTEGRATION, ORG);
    assert_eq!(usage.minute_count, 10);
    assert_eq!(usage.hour_count, 10);
    assert_eq!(usage.warnings_emitted, 1);

    // drop below 50% to re-arm, then climb past 80% again
    clock.advance(Duration::from_secs(61));
    for _ in 0..9 {
        limiter.admit(INTEGRATION, ORG).await;
    }
    let usage = limiter.usage(INTEGRATION, ORG);
    assert_eq!(usage.minute_count, 9);
    assert_eq!(usage.hour_count, 19);
    assert_eq!(usage.warnings_emitted, 2);
}

#[tokio::test]
async fn test_usage_of_unknown_pair_is_zero() {
    let (limiter, _, _) = limiter(Vec::new());
    assert_eq!(limiter.usage(INTEGRATION, ORG).minute_count, 0);
}

// ============================================================================
// Concurrency and Idle Sweep
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_admits_on_one_key_never_overshoot() {
    let (limiter, _, _) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(20, 1000, 5),
    )]);
    let limiter = Arc::new(limiter);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..60 {
        let limiter = limiter.clone();
        tasks.spawn(async move { limiter.admit(INTEGRATION, ORG).await.allowed });
    }
    let mut admitted = 0u32;
    while let Some(allowed) = tasks.join_next().await {
        if allowed.unwrap() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 25);
    assert_eq!(limiter.usage(INTEGRATION, ORG).minute_count, 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_admits_under_the_cap_are_all_counted() {
    let (limiter, _, _) = limiter(vec![(
        RateLimitKey::new(INTEGRATION, ORG),
        RateLimitConfig::new(100, 1000, 0),
    )]);
    let limiter = Arc::new(limiter);

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..40 {
        let limiter = limiter.clone();
        tasks.spawn(async move { limiter.admit(INTEGRATION, ORG).await.allowed });
    }
    while let Some(allowed) = tasks.join_next().await {
        assert!(allowed.unwrap());
    }

    let usage = limiter.usage(INTEGRATION, ORG);
    assert_eq!(usage.minute_count, 40);
    assert_eq!(usage.hour_count, 40);
}

#[tokio::test]
async fn test_idle_buckets_are_swept_after_an_hour() {
    let (limiter, _, clock) = limiter(Vec::new());

    limiter.admit(INTEGRATION, ORG).await;
    limiter.admit(INTEGRATION, "agency-y:branch-2").await;
    assert_eq!(limiter.tracked_buckets(), 2);

    // still inside the hour window: kept
    clock.advance(Duration::from_secs(30 * 60));
    limiter.admit(INTEGRATION, ORG).await;
    assert_eq!(limiter.tracked_buckets(), 2);

    // agency-y has been idle for over an hour
    clock.advance(Duration::from_secs(31 * 60));
    limiter.admit(INTEGRATION, ORG).await;
    assert_eq!(limiter.tracked_buckets(), 1);
    assert_eq!(limiter.usage(INTEGRATION, "agency-y:branch-2").hour_count, 0);
    assert_eq!(limiter.usage(INTEGRATION, ORG).hour_count, 2);
}
