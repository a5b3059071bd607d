//! Port traits
//!
//! Interfaces the application layer depends on. Implementations live in
//! `dsw-providers` (adapters) and `dsw-infrastructure` (stores, clock,
//! randomness, telemetry).

pub mod clock;
pub mod providers;
pub mod stores;
pub mod telemetry;

pub use clock::{Clock, RandomSource};
pub use providers::{ProviderAdapter, ProviderHealth, ProviderHealthStatus};
pub use stores::{RateLimitConfigStore, RoutingSettingsSource};
pub use telemetry::{ComparisonRecord, ComparisonSink, ComparisonStore};
