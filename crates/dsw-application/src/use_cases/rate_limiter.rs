//! Rate Limiting Use Case
//!
//! Sliding window rate limiting per (integration, organization) with a
//! burst allowance on the minute window. Configuration is resolved from the
//! store with priority organization -> integration default -> hardcoded
//! default and cached for five minutes.
//!
//! The limiter fails open: any internal error admits the request and is
//! reported only as a diagnostic on the decision.
//!
//! At most once a minute, buckets with nothing left in the hour window and
//! expired cached configurations are swept out.

use dashmap::DashMap;
use dsw_domain::constants::{
    RATE_LIMIT_CONFIG_CACHE_TTL_SECS, RATE_LIMIT_HOUR_WINDOW_SECS, RATE_LIMIT_MINUTE_WINDOW_SECS,
    RATE_LIMIT_REARM_RATIO, RATE_LIMIT_WARNING_RATIO,
};
use dsw_domain::error::Result;
use dsw_domain::ports::{Clock, RateLimitConfigStore};
use dsw_domain::value_objects::{
    AdmissionDecision, CacheEntry, DenyReason, RateLimitConfig, RateLimitKey,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

const MINUTE_WINDOW_MS: i64 = RATE_LIMIT_MINUTE_WINDOW_SECS * 1000;
const HOUR_WINDOW_MS: i64 = RATE_LIMIT_HOUR_WINDOW_SECS * 1000;

/// Current usage of one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BucketUsage {
    /// Requests admitted in the last minute
    pub minute_count: u32,
    /// Requests admitted in the last hour
    pub hour_count: u32,
    /// High-usage warnings emitted so far
    pub warnings_emitted: u32,
}

/// Admitted request timestamps for one (integration, organization)
#[derive(Debug)]
struct RequestBucket {
    /// Unix milliseconds, ascending
    timestamps: VecDeque<i64>,
    warning_armed: bool,
    warnings_emitted: u32,
}

impl Default for RequestBucket {
    fn default() -> Self {
        Self {
            timestamps: VecDeque::new(),
            warning_armed: true,
            warnings_emitted: 0,
        }
    }
}

impl RequestBucket {
    fn prune(&mut self, now: i64) {
        let horizon = now - HOUR_WINDOW_MS;
        while self.timestamps.front().is_some_and(|&ts| ts <= horizon) {
            self.timestamps.pop_front();
        }
    }

    /// Index of the first timestamp inside the minute window
    fn minute_start(&self, now: i64) -> usize {
        let window_start = now - MINUTE_WINDOW_MS;
        self.timestamps.partition_point(|&ts| ts <= window_start)
    }

    fn usage(&self, now: i64) -> BucketUsage {
        let horizon = now - HOUR_WINDOW_MS;
        let hour = self.timestamps.iter().filter(|&&ts| ts > horizon).count();
        let minute = self.timestamps.len() - self.minute_start(now);
        BucketUsage {
            minute_count: saturating_u32(minute),
            hour_count: saturating_u32(hour),
            warnings_emitted: self.warnings_emitted,
        }
    }

    fn check(&mut self, key: &RateLimitKey, config: &RateLimitConfig, now: i64) -> AdmissionDecision {
        self.prune(now);

        let minute_idx = self.minute_start(now);
        let minute_count = saturating_u32(self.timestamps.len() - minute_idx);
        let hour_count = saturating_u32(self.timestamps.len());
        let minute_cap = config.minute_cap();

        if minute_count >= minute_cap {
            let oldest = self.timestamps.get(minute_idx).copied();
            let retry_after = retry_after_secs(oldest, MINUTE_WINDOW_MS, now);
            debug!(key = %key, minute_count, minute_cap, retry_after, "Minute limit exceeded");
            return AdmissionDecision::denied(DenyReason::MinuteLimitExceeded, retry_after, minute_cap);
        }

        if hour_count >= config.req_per_hour {
            let oldest = self.timestamps.front().copied();
            let retry_after = retry_after_secs(oldest, HOUR_WINDOW_MS, now);
            debug!(key = %key, hour_count, limit = config.req_per_hour, retry_after, "Hour limit exceeded");
            return AdmissionDecision::denied(DenyReason::HourLimitExceeded, retry_after, minute_cap);
        }

        self.timestamps.push_back(now);

        let remaining = config
            .req_per_minute
            .saturating_sub(minute_count + 1)
            .min(config.req_per_hour.saturating_sub(hour_count + 1));

        self.track_warning(key, config, minute_count + 1);

        AdmissionDecision::admitted(minute_cap, remaining)
    }

    /// Debounced high-usage warning: fires once above 80%, re-arms below 50%
    fn track_warning(&mut self, key: &RateLimitKey, config: &RateLimitConfig, minute_count: u32) {
        if config.req_per_minute == 0 {
            return;
        }
        let usage = f64::from(minute_count) / f64::from(config.req_per_minute);
        if usage > RATE_LIMIT_WARNING_RATIO && self.warning_armed {
            self.warning_armed = false;
            self.warnings_emitted += 1;
            warn!(
                key = %key,
                minute_count,
                req_per_minute = config.req_per_minute,
                usage_pct = usage * 100.0,
                "Rate limit usage above 80%"
            );
        } else if usage < RATE_LIMIT_REARM_RATIO {
            self.warning_armed = true;
        }
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Whole seconds until `oldest` leaves a window of `window_ms`, at least 1
fn retry_after_secs(oldest: Option<i64>, window_ms: i64, now: i64) -> u64 {
    let wait_ms = oldest.map_or(window_ms, |ts| ts + window_ms - now).max(1);
    u64::try_from((wait_ms + 999) / 1000).unwrap_or(1).max(1)
}

/// Sliding-window rate limiter
pub struct RateLimiter {
    store: Arc<dyn RateLimitConfigStore>,
    clock: Arc<dyn Clock>,
    config_ttl: Duration,
    configs: DashMap<RateLimitKey, CacheEntry<RateLimitConfig>>,
    buckets: DashMap<RateLimitKey, RequestBucket>,
    /// Unix milliseconds of the last idle sweep
    last_sweep: AtomicI64,
}

impl RateLimiter {
    /// Create a limiter with the default 5 minute config TTL
    pub fn new(store: Arc<dyn RateLimitConfigStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config_ttl(
            store,
            clock,
            Duration::from_secs(RATE_LIMIT_CONFIG_CACHE_TTL_SECS),
        )
    }

    /// Create a limiter with a custom config TTL
    pub fn with_config_ttl(
        store: Arc<dyn RateLimitConfigStore>,
        clock: Arc<dyn Clock>,
        config_ttl: Duration,
    ) -> Self {
        let last_sweep = AtomicI64::new(clock.now_millis());
        Self {
            store,
            clock,
            config_ttl,
            configs: DashMap::new(),
            buckets: DashMap::new(),
            last_sweep,
        }
    }

    /// Admit or deny one request
    ///
    /// Never fails: internal errors admit the request with a diagnostic.
    pub async fn admit(&self, integration: &str, organization_id: &str) -> AdmissionDecision {
        let key = RateLimitKey::new(integration, organization_id);

        let config = match self.resolve_config(&key).await {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    integration,
                    organization = organization_id,
                    error = %e,
                    "Rate limiter unavailable, admitting request"
                );
                return AdmissionDecision::fail_open(e.to_string());
            }
        };

        if !config.enabled {
            return AdmissionDecision::unlimited();
        }

        let now = self.clock.now_millis();
        self.sweep_idle(now);
        let mut bucket = self.buckets.entry(key.clone()).or_default();
        bucket.check(&key, &config, now)
    }

    /// Resolved configuration for a pair, using the cache when fresh
    pub async fn resolve_config(&self, key: &RateLimitKey) -> Result<RateLimitConfig> {
        let now = self.clock.now();
        if let Some(entry) = self.configs.get(key) {
            if entry.is_fresh(now, self.config_ttl) {
                return Ok(entry.value.clone());
            }
        }

        let config = match self.store.get(key).await? {
            Some(config) => config,
            None if key.is_default() => RateLimitConfig::default(),
            None => self
                .store
                .get(&RateLimitKey::integration_default(&key.integration))
                .await?
                .unwrap_or_default(),
        };

        self.configs
            .insert(key.clone(), CacheEntry::new(config.clone(), now));
        Ok(config)
    }

    /// Store a configuration and drop any cached resolution it affects
    pub async fn set_config(&self, key: &RateLimitKey, mut config: RateLimitConfig) -> Result<()> {
        config.last_updated = Some(self.clock.now());
        self.store.put(key, config).await?;
        self.invalidate(key);
        info!(key = %key, "Rate limit configuration stored");
        Ok(())
    }

    /// Remove a stored configuration and drop any cached resolution it affects
    pub async fn remove_config(&self, key: &RateLimitKey) -> Result<bool> {
        let existed = self.store.delete(key).await?;
        self.invalidate(key);
        if existed {
            info!(key = %key, "Rate limit configuration removed");
        }
        Ok(existed)
    }

    /// Current usage of a bucket; zero for unknown pairs
    pub fn usage(&self, integration: &str, organization_id: &str) -> BucketUsage {
        let key = RateLimitKey::new(integration, organization_id);
        let now = self.clock.now_millis();
        self.buckets
            .get(&key)
            .map(|bucket| bucket.usage(now))
            .unwrap_or_default()
    }

    /// Number of (integration, organization) pairs currently tracked
    pub fn tracked_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Drop empty buckets and expired cached configurations
    ///
    /// Runs at most once per minute window; concurrent callers skip it.
    fn sweep_idle(&self, now: i64) {
        let last = self.last_sweep.load(Ordering::Relaxed);
        if now - last < MINUTE_WINDOW_MS
            || self
                .last_sweep
                .compare_exchange(last, now, Ordering::AcqRel, Ordering::Relaxed)
                .is_err()
        {
            return;
        }

        let before = self.buckets.len();
        self.buckets.retain(|_, bucket| {
            bucket.prune(now);
            !bucket.timestamps.is_empty()
        });
        let cached_at = self.clock.now();
        self.configs
            .retain(|_, entry| entry.is_fresh(cached_at, self.config_ttl));

        let dropped = before.saturating_sub(self.buckets.len());
        if dropped > 0 {
            debug!(dropped, remaining = self.buckets.len(), "Swept idle rate limit buckets");
        }
    }

    fn invalidate(&self, key: &RateLimitKey) {
        if key.is_default() {
            // integration defaults feed every organization of the integration
            self.configs.retain(|k, _| k.integration != key.integration);
        } else {
            self.configs.remove(key);
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config_ttl", &self.config_ttl)
            .field("buckets", &self.buckets.len())
            .finish()
    }
}
