//! Application configuration
//!
//! Typed configuration sections and the figment-based [`ConfigLoader`].

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, CacheConfig, LoggingConfig, ProviderEndpointConfig, ProvidersConfig,
    RateLimitRule, RateLimitSection,
};
