//! Configuration types
//!
//! Every section deserializes with defaults so a partial `dsw.toml` is
//! valid. Numeric ranges and URLs are checked with `validator`; routing
//! settings are checked by the domain when the loader validates them.

use crate::constants::{
    DEFAULT_HTTP_CLIENT_TIMEOUT_MS, DEFAULT_LEGACY_ADAPTER, DEFAULT_LEGACY_BASE_URL,
    DEFAULT_LOG_LEVEL, DEFAULT_SALESFORCE_ADAPTER, DEFAULT_SALESFORCE_BASE_URL,
};
use dsw_application::ports::ProviderAdapterConfig;
use dsw_domain::constants::{CONFIG_CACHE_TTL_SECS, RATE_LIMIT_CONFIG_CACHE_TTL_SECS};
use dsw_domain::value_objects::{RateLimitConfig, RateLimitKey, RoutingSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    /// Logging
    pub logging: LoggingConfig,
    /// Raw global routing settings, seeding the settings source
    pub routing: RoutingSettings,
    /// Seeded rate-limit rows
    #[validate(nested)]
    pub rate_limit: RateLimitSection,
    /// Cache TTLs
    #[validate(nested)]
    pub cache: CacheConfig,
    /// Backend endpoints
    #[validate(nested)]
    pub providers: ProvidersConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable JSON output format
    pub json_format: bool,
    /// Log to file in addition to stdout
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}

/// Cache TTLs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CacheConfig {
    /// TTL of cached global and organization routing configuration
    #[validate(range(min = 1))]
    pub routing_config_ttl_secs: u64,
    /// TTL of cached rate-limit configuration
    #[validate(range(min = 1))]
    pub rate_limit_config_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            routing_config_ttl_secs: CONFIG_CACHE_TTL_SECS,
            rate_limit_config_ttl_secs: RATE_LIMIT_CONFIG_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    /// Routing configuration TTL
    pub fn routing_ttl(&self) -> Duration {
        Duration::from_secs(self.routing_config_ttl_secs)
    }

    /// Rate-limit configuration TTL
    pub fn rate_limit_ttl(&self) -> Duration {
        Duration::from_secs(self.rate_limit_config_ttl_secs)
    }
}

/// Rate-limit rows loaded into the store at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RateLimitSection {
    /// One row per (integration, organization); no organization means the
    /// integration default
    #[validate(nested)]
    pub rules: Vec<RateLimitRule>,
}

fn enabled() -> bool {
    true
}

/// One seeded rate-limit row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RateLimitRule {
    /// Calling integration
    #[validate(length(min = 1))]
    pub integration: String,
    /// `agency:branch`; omitted for the integration default
    #[serde(default)]
    pub organization: Option<String>,
    /// Steady requests per minute
    #[validate(range(min = 1))]
    pub req_per_minute: u32,
    /// Requests per hour
    #[validate(range(min = 1))]
    pub req_per_hour: u32,
    /// Extra requests above the minute cap
    #[serde(default)]
    pub burst_allowance: u32,
    /// Disabled rows admit everything
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl RateLimitRule {
    /// Store key of this row
    pub fn key(&self) -> RateLimitKey {
        match &self.organization {
            Some(org) => RateLimitKey::new(&self.integration, org),
            None => RateLimitKey::integration_default(&self.integration),
        }
    }

    /// Stored configuration of this row
    pub fn to_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            enabled: self.enabled,
            ..RateLimitConfig::new(self.req_per_minute, self.req_per_hour, self.burst_allowance)
        }
    }
}

/// Both backend endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Legacy backend
    #[validate(nested)]
    pub legacy: ProviderEndpointConfig,
    /// Salesforce backend
    #[validate(nested)]
    pub salesforce: ProviderEndpointConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            legacy: ProviderEndpointConfig::new(DEFAULT_LEGACY_ADAPTER, DEFAULT_LEGACY_BASE_URL),
            salesforce: ProviderEndpointConfig::new(
                DEFAULT_SALESFORCE_ADAPTER,
                DEFAULT_SALESFORCE_BASE_URL,
            ),
        }
    }
}

fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("base_url_scheme"))
    }
}

/// One backend endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProviderEndpointConfig {
    /// Registry name of the adapter
    #[validate(length(min = 1))]
    pub adapter: String,
    /// Base URL, `http` or `https`
    #[validate(custom(function = "validate_base_url"))]
    pub base_url: String,
    /// HTTP client timeout
    #[serde(default = "default_client_timeout_ms")]
    #[validate(range(min = 1))]
    pub timeout_ms: u64,
    /// Service-level API key
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_client_timeout_ms() -> u64 {
    DEFAULT_HTTP_CLIENT_TIMEOUT_MS
}

impl ProviderEndpointConfig {
    /// Endpoint with the default client timeout and no API key
    pub fn new(adapter: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            base_url: base_url.into(),
            timeout_ms: DEFAULT_HTTP_CLIENT_TIMEOUT_MS,
            api_key: None,
        }
    }

    /// Registry factory input
    pub fn to_adapter_config(&self) -> ProviderAdapterConfig {
        let config = ProviderAdapterConfig::new(&self.adapter, &self.base_url)
            .with_timeout(Duration::from_millis(self.timeout_ms));
        match &self.api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }
}
