//! Value Objects
//!
//! Immutable data carried between the routing components.

pub mod cache;
pub mod config;
pub mod deposit;
pub mod outcome;
pub mod rate_limit;
pub mod routing;

pub use cache::CacheEntry;
pub use config::{
    CircuitBreakerSettings, EffectiveConfig, FeatureFlags, GlobalConfig, OrganizationKey,
    ProviderTimeouts, RetryPolicy, RoutingSettings, SettingsUpdate,
};
pub use deposit::{DepositAction, OrgCredentials, Party, PropertyAddress, StandardDepositPayload};
pub use outcome::{
    ComparisonResult, ExecutionReport, ExecutionState, Outcome, ProviderResponse,
};
pub use rate_limit::{AdmissionDecision, DenyReason, RateLimitConfig, RateLimitKey};
pub use routing::{ExecutionPlan, ProviderKind, ProviderPreference, RoutingMode, RoutingTarget};
