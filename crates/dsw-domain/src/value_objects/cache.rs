//! Timestamped cache entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A cached value and the time it was stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// Cached value
    pub value: T,
    /// Time the value was stored
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Wrap a value stored at `now`
    pub fn new(value: T, now: DateTime<Utc>) -> Self {
        Self {
            value,
            stored_at: now,
        }
    }

    /// Whether the entry is younger than `ttl` at `now`
    ///
    /// An entry stamped in the future (clock moved backwards) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match now.signed_duration_since(self.stored_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }
}
