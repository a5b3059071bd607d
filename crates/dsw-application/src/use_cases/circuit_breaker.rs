//! Per-provider circuit breaker
//!
//! Counts consecutive retryable failures. After `failure_threshold` of them
//! the circuit opens and calls fail fast; once `open_timeout_ms` has
//! elapsed a single trial call is let through (half-open). A successful
//! trial closes the circuit, a failed one reopens it. A trial that never
//! reports back (its caller was cancelled) is replaced by a new one after
//! another `open_timeout_ms`.

use chrono::{DateTime, Utc};
use dsw_domain::ports::Clock;
use dsw_domain::value_objects::{CircuitBreakerSettings, ProviderKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls flow normally
    Closed,
    /// Calls are rejected without reaching the provider
    Open,
    /// One trial call is in flight
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half_open"),
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    /// When the circuit last opened or last granted a trial
    since: Option<DateTime<Utc>>,
}

/// Circuit breaker guarding one provider
pub struct CircuitBreaker {
    provider: ProviderKind,
    clock: Arc<dyn Clock>,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    /// Create a closed breaker
    pub fn new(provider: ProviderKind, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            clock,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                since: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a call may proceed
    ///
    /// Moves an open circuit to half-open once its timeout elapsed; only the
    /// caller that performs that move is admitted. A half-open circuit whose
    /// trial has been outstanding for a full timeout grants a fresh trial.
    pub fn try_acquire(&self, settings: &CircuitBreakerSettings) -> bool {
        let mut inner = self.lock();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open | CircuitState::HalfOpen => {
                if !self.timeout_elapsed(&inner, settings) {
                    return false;
                }
                if inner.state == CircuitState::HalfOpen {
                    warn!(provider = %self.provider, "Half-open trial never completed, granting a new one");
                    inner.since = Some(self.clock.now());
                } else {
                    self.transition(&mut inner, CircuitState::HalfOpen);
                }
                true
            }
        }
    }

    fn timeout_elapsed(&self, inner: &BreakerInner, settings: &CircuitBreakerSettings) -> bool {
        let Some(since) = inner.since else {
            return true;
        };
        u64::try_from((self.clock.now() - since).num_milliseconds())
            .is_ok_and(|elapsed_ms| elapsed_ms >= settings.open_timeout_ms)
    }

    /// Record a successful call
    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = 0;
        if inner.state != CircuitState::Closed {
            self.transition(&mut inner, CircuitState::Closed);
        }
    }

    /// Record a failed call
    pub fn record_failure(&self, settings: &CircuitBreakerSettings) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        let trip = match inner.state {
            CircuitState::HalfOpen => true,
            CircuitState::Closed => inner.consecutive_failures >= settings.failure_threshold,
            CircuitState::Open => false,
        };
        if trip {
            self.transition(&mut inner, CircuitState::Open);
        }
    }

    /// Current state
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    /// Consecutive failures since the last success
    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    fn transition(&self, inner: &mut BreakerInner, to: CircuitState) {
        let from = inner.state;
        inner.state = to;
        match to {
            CircuitState::Open | CircuitState::HalfOpen => inner.since = Some(self.clock.now()),
            CircuitState::Closed => inner.since = None,
        }
        info!(
            provider = %self.provider,
            from = %from,
            to = %to,
            failures = inner.consecutive_failures,
            "Circuit breaker state transition"
        );
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("provider", &self.provider)
            .field("state", &self.state())
            .finish()
    }
}
