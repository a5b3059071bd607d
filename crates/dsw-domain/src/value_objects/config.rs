//! Routing configuration value objects
//!
//! [`RoutingSettings`] is the raw, unvalidated shape held by the source of
//! truth. [`RoutingSettings::validate`] turns it into a typed
//! [`GlobalConfig`], and [`EffectiveConfig`] is a global config with an
//! organization preference applied.

use crate::constants::{
    CIRCUIT_BREAKER_FAILURE_THRESHOLD, CIRCUIT_BREAKER_TIMEOUT_MS, DEFAULT_RETRY_COUNT,
    DEFAULT_RETRY_DELAY_MS, LEGACY_TIMEOUT_MS, NEW_TIMEOUT_MS,
};
use crate::error::{Error, Result};
use crate::value_objects::routing::{ProviderKind, ProviderPreference, RoutingMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Raw routing settings as stored by the source of truth
///
/// String-typed fields are validated eagerly by [`RoutingSettings::validate`];
/// nothing here is ever silently coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Routing mode label
    pub routing_mode: String,
    /// Share of forwarding traffic sent to the new backend, 0..=100
    pub forwarding_percentage: f64,
    /// Provider considered authoritative (`legacy` or `new`)
    pub active_provider: String,
    /// Dual execution flag
    pub dual_mode: bool,
    /// Fall back to legacy when the new backend fails
    pub fallback_enabled: bool,
    /// Compare results when both backends run
    pub comparison_enabled: bool,
    /// Honor per-organization preferences
    pub allow_organization_overrides: bool,
    /// Retries after the first attempt
    pub retry_count: u32,
    /// Base backoff delay
    pub retry_delay_ms: u64,
    /// Per-call timeout for the legacy backend
    pub legacy_timeout_ms: u64,
    /// Per-call timeout for the new backend
    pub new_timeout_ms: u64,
    /// Consecutive failures before a circuit opens
    pub circuit_breaker_threshold: u32,
    /// How long an open circuit stays open
    pub circuit_breaker_timeout_ms: u64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            routing_mode: RoutingMode::LegacyOnly.as_str().to_string(),
            forwarding_percentage: 0.0,
            active_provider: ProviderKind::Legacy.as_str().to_string(),
            dual_mode: false,
            fallback_enabled: true,
            comparison_enabled: true,
            allow_organization_overrides: true,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            legacy_timeout_ms: LEGACY_TIMEOUT_MS,
            new_timeout_ms: NEW_TIMEOUT_MS,
            circuit_breaker_threshold: CIRCUIT_BREAKER_FAILURE_THRESHOLD,
            circuit_breaker_timeout_ms: CIRCUIT_BREAKER_TIMEOUT_MS,
        }
    }
}

impl RoutingSettings {
    /// Validate every field and build the typed configuration
    pub fn validate(&self) -> Result<GlobalConfig> {
        let routing_mode: RoutingMode = self.routing_mode.parse()?;
        let forwarding_percentage = validate_percentage(self.forwarding_percentage)?;
        let active_provider: ProviderKind = self.active_provider.parse()?;

        if self.legacy_timeout_ms == 0 || self.new_timeout_ms == 0 {
            return Err(Error::config_validation(
                "provider timeouts must be greater than 0",
            ));
        }
        if self.circuit_breaker_threshold == 0 {
            return Err(Error::config_validation(
                "circuit breaker threshold must be greater than 0",
            ));
        }

        Ok(GlobalConfig {
            routing_mode,
            forwarding_percentage,
            active_provider,
            features: FeatureFlags {
                dual_mode: self.dual_mode,
                fallback: self.fallback_enabled,
                comparison: self.comparison_enabled,
            },
            allow_organization_overrides: self.allow_organization_overrides,
            retry: RetryPolicy {
                max_retries: self.retry_count,
                base_delay_ms: self.retry_delay_ms,
            },
            timeouts: ProviderTimeouts {
                legacy_ms: self.legacy_timeout_ms,
                new_ms: self.new_timeout_ms,
            },
            circuit_breaker: CircuitBreakerSettings {
                failure_threshold: self.circuit_breaker_threshold,
                open_timeout_ms: self.circuit_breaker_timeout_ms,
            },
        })
    }

    /// Apply a validated update in place
    pub fn apply(&mut self, update: &SettingsUpdate) {
        match update {
            SettingsUpdate::RoutingMode(mode) => self.routing_mode = mode.as_str().to_string(),
            SettingsUpdate::ForwardingPercentage(pct) => self.forwarding_percentage = *pct,
            SettingsUpdate::DualMode(enabled) => self.dual_mode = *enabled,
        }
    }
}

/// Check a forwarding percentage is a finite value within 0..=100
pub fn validate_percentage(value: f64) -> Result<f64> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::config_validation(format!(
            "forwarding percentage must be within 0..=100, got {value}"
        )))
    }
}

/// Dynamic update to the routing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "field", content = "value")]
pub enum SettingsUpdate {
    /// Replace the routing mode
    RoutingMode(RoutingMode),
    /// Replace the forwarding percentage
    ForwardingPercentage(f64),
    /// Toggle the informational dual mode flag
    DualMode(bool),
}

/// Feature flags carried by the global configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Dual execution advertised to callers
    ///
    /// Informational: the execution plan follows `routing_mode` alone, and a
    /// `dual` preference reaches both backends by rewriting the mode to
    /// `both`.
    pub dual_mode: bool,
    /// Legacy fallback enabled
    pub fallback: bool,
    /// Result comparison enabled
    pub comparison: bool,
}

/// Exponential backoff policy for provider calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each subsequent retry
    pub base_delay_ms: u64,
}

impl RetryPolicy {
    /// Base delay as a [`Duration`]
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Per-provider call timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTimeouts {
    /// Legacy backend timeout
    pub legacy_ms: u64,
    /// New backend timeout
    pub new_ms: u64,
}

impl ProviderTimeouts {
    /// Timeout applying to the given provider
    pub fn for_provider(&self, kind: ProviderKind) -> Duration {
        match kind {
            ProviderKind::Legacy => Duration::from_millis(self.legacy_ms),
            ProviderKind::New => Duration::from_millis(self.new_ms),
        }
    }
}

/// Circuit breaker thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerSettings {
    /// Consecutive failures before opening
    pub failure_threshold: u32,
    /// Open duration before a trial call is allowed
    pub open_timeout_ms: u64,
}

/// Validated global routing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Routing mode
    pub routing_mode: RoutingMode,
    /// Share of forwarding traffic sent to the new backend
    pub forwarding_percentage: f64,
    /// Authoritative provider
    pub active_provider: ProviderKind,
    /// Feature flags
    pub features: FeatureFlags,
    /// Whether organization preferences are honored
    pub allow_organization_overrides: bool,
    /// Retry policy
    pub retry: RetryPolicy,
    /// Per-provider timeouts
    pub timeouts: ProviderTimeouts,
    /// Circuit breaker thresholds
    pub circuit_breaker: CircuitBreakerSettings,
}

/// Organization identity: agency plus branch
///
/// Branches of the same agency can carry different preferences, so
/// anything keyed by organization uses the full tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganizationKey {
    /// Agency reference
    pub agency_ref: String,
    /// Branch identifier within the agency
    pub branch_id: String,
}

impl OrganizationKey {
    /// Create a key from agency and branch
    pub fn new(agency_ref: impl Into<String>, branch_id: impl Into<String>) -> Self {
        Self {
            agency_ref: agency_ref.into(),
            branch_id: branch_id.into(),
        }
    }
}

impl fmt::Display for OrganizationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.agency_ref, self.branch_id)
    }
}

/// Global configuration with an organization preference applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Merged configuration
    pub config: GlobalConfig,
    /// Organization the merge was computed for, `None` for the global scope
    pub organization: Option<OrganizationKey>,
    /// Preference that was applied
    pub preference: ProviderPreference,
}

impl EffectiveConfig {
    /// Effective configuration equal to the global one
    pub fn global(config: GlobalConfig) -> Self {
        Self {
            config,
            organization: None,
            preference: ProviderPreference::Auto,
        }
    }

    /// Merge a preference into a copy of the global configuration
    pub fn for_organization(
        global: &GlobalConfig,
        organization: OrganizationKey,
        preference: ProviderPreference,
    ) -> Self {
        let mut config = global.clone();
        match preference {
            ProviderPreference::Auto => {}
            ProviderPreference::Current => {
                config.routing_mode = RoutingMode::LegacyOnly;
                config.features.dual_mode = false;
            }
            ProviderPreference::Salesforce => {
                config.routing_mode = RoutingMode::SalesforceOnly;
                config.features.dual_mode = false;
            }
            ProviderPreference::Dual => {
                config.routing_mode = RoutingMode::Both;
                config.features.dual_mode = true;
                config.features.comparison = true;
            }
        }
        Self {
            config,
            organization: Some(organization),
            preference,
        }
    }

    /// Routing mode after the merge
    pub fn routing_mode(&self) -> RoutingMode {
        self.config.routing_mode
    }
}
