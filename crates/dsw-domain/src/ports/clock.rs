//! Time and randomness ports
//!
//! Injected so TTL expiry, sliding windows and forwarding draws can be driven
//! deterministically in tests.

use chrono::{DateTime, Utc};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current wall-clock time
    fn now(&self) -> DateTime<Utc>;

    /// Current time as Unix milliseconds
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Source of uniform random percentages
pub trait RandomSource: Send + Sync {
    /// Sample uniformly from `[0, 100)`
    fn next_percent(&self) -> f64;
}
