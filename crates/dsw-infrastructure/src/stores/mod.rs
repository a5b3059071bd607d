//! In-memory store implementations
//!
//! Process-local backings for the persistence ports. Durable engines plug
//! in behind the same traits.

mod comparisons;
mod rate_limits;
mod routing_settings;

pub use comparisons::InMemoryComparisonStore;
pub use rate_limits::InMemoryRateLimitConfigStore;
pub use routing_settings::InMemoryRoutingSettingsSource;
