//! System time and randomness

use chrono::{DateTime, Utc};
use dsw_domain::ports::{Clock, RandomSource};
use rand::Rng;

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Thread-local RNG sampling `[0, 100)`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_percent(&self) -> f64 {
        rand::rng().random_range(0.0..100.0)
    }
}
