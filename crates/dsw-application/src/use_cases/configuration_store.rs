//! Configuration Store Use Case
//!
//! Loads, validates and caches the global routing configuration and the
//! per-organization effective configurations derived from it.
//!
//! Both caches live in a single snapshot swapped atomically on
//! invalidation, so a reader never combines a stale global config with a
//! fresh organization entry (or the reverse). Expired organization entries
//! are dropped whenever the global entry is reloaded.

use arc_swap::{ArcSwap, ArcSwapOption};
use dashmap::DashMap;
use dsw_domain::constants::CONFIG_CACHE_TTL_SECS;
use dsw_domain::error::{Error, Result};
use dsw_domain::ports::{Clock, RoutingSettingsSource};
use dsw_domain::value_objects::config::validate_percentage;
use dsw_domain::value_objects::{
    CacheEntry, EffectiveConfig, GlobalConfig, OrganizationKey, ProviderPreference, RoutingMode,
    SettingsUpdate,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Organization cache key; always branch qualified
type OrganizationCacheKey = (OrganizationKey, ProviderPreference);

#[derive(Default)]
struct ConfigCache {
    global: ArcSwapOption<CacheEntry<GlobalConfig>>,
    organizations: DashMap<OrganizationCacheKey, CacheEntry<EffectiveConfig>>,
}

/// Cached, validated routing configuration
pub struct ConfigurationStore {
    source: Arc<dyn RoutingSettingsSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cache: ArcSwap<ConfigCache>,
}

impl ConfigurationStore {
    /// Create a store with the default 5 minute TTL
    pub fn new(source: Arc<dyn RoutingSettingsSource>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(source, clock, Duration::from_secs(CONFIG_CACHE_TTL_SECS))
    }

    /// Create a store with a custom TTL
    pub fn with_ttl(
        source: Arc<dyn RoutingSettingsSource>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            clock,
            ttl,
            cache: ArcSwap::from_pointee(ConfigCache::default()),
        }
    }

    /// Global configuration, reloaded from the source when the cache expired
    ///
    /// Invalid settings raise [`Error::ConfigValidation`].
    pub async fn global_config(&self) -> Result<GlobalConfig> {
        let cache = self.cache.load_full();
        self.global_from(&cache).await
    }

    /// Effective configuration for one organization branch
    ///
    /// When organization overrides are disabled the global configuration is
    /// returned unchanged whatever the preference.
    pub async fn organization_config(
        &self,
        agency_ref: &str,
        branch_id: &str,
        preference: ProviderPreference,
    ) -> Result<EffectiveConfig> {
        if agency_ref.is_empty() || branch_id.is_empty() {
            return Err(Error::invalid_argument(
                "agency reference and branch id are required",
            ));
        }
        let organization = OrganizationKey::new(agency_ref, branch_id);

        let cache = self.cache.load_full();
        let global = self.global_from(&cache).await?;

        if !global.allow_organization_overrides {
            return Ok(EffectiveConfig::for_organization(
                &global,
                organization,
                ProviderPreference::Auto,
            ));
        }

        let now = self.clock.now();
        let key = (organization, preference);
        if let Some(entry) = cache.organizations.get(&key) {
            if entry.is_fresh(now, self.ttl) {
                return Ok(entry.value.clone());
            }
        }

        let effective = EffectiveConfig::for_organization(&global, key.0.clone(), preference);
        debug!(
            organization = %key.0,
            preference = %preference,
            mode = %effective.routing_mode(),
            "Organization routing configuration computed"
        );
        cache
            .organizations
            .insert(key, CacheEntry::new(effective.clone(), now));
        Ok(effective)
    }

    /// Validate and persist a new routing mode, then clear every cache
    pub async fn update_routing_mode(&self, mode: &str) -> Result<()> {
        let mode: RoutingMode = mode.parse()?;
        self.apply_update(SettingsUpdate::RoutingMode(mode)).await
    }

    /// Validate and persist a new forwarding percentage, then clear every cache
    pub async fn update_forwarding_percentage(&self, percentage: f64) -> Result<()> {
        let percentage = validate_percentage(percentage)?;
        self.apply_update(SettingsUpdate::ForwardingPercentage(percentage))
            .await
    }

    /// Persist the dual mode flag, then clear every cache
    ///
    /// The flag is reported in the effective configuration; routing keeps
    /// following the routing mode.
    pub async fn update_dual_mode(&self, enabled: bool) -> Result<()> {
        self.apply_update(SettingsUpdate::DualMode(enabled)).await
    }

    /// Drop the global entry and every organization entry in one step
    pub fn invalidate(&self) {
        self.cache.store(Arc::new(ConfigCache::default()));
        debug!("Routing configuration caches cleared");
    }

    /// Number of organization entries currently cached
    pub fn cached_organizations(&self) -> usize {
        self.cache.load().organizations.len()
    }

    async fn apply_update(&self, update: SettingsUpdate) -> Result<()> {
        self.source.apply(&update).await?;
        self.invalidate();
        info!(update = ?update, "Routing configuration updated");
        Ok(())
    }

    async fn global_from(&self, cache: &ConfigCache) -> Result<GlobalConfig> {
        let now = self.clock.now();
        if let Some(entry) = cache.global.load_full() {
            if entry.is_fresh(now, self.ttl) {
                return Ok(entry.value.clone());
            }
        }

        let settings = self.source.load().await?;
        let config = settings.validate().inspect_err(|e| {
            error!(error = %e, "Rejected routing configuration");
        })?;

        cache
            .global
            .store(Some(Arc::new(CacheEntry::new(config.clone(), now))));
        cache
            .organizations
            .retain(|_, entry| entry.is_fresh(now, self.ttl));
        debug!(
            mode = %config.routing_mode,
            forwarding_percentage = config.forwarding_percentage,
            active_provider = %config.active_provider,
            cached_organizations = cache.organizations.len(),
            "Global routing configuration loaded"
        );
        Ok(config)
    }
}

impl std::fmt::Debug for ConfigurationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationStore")
            .field("ttl", &self.ttl)
            .field("cached_organizations", &self.cached_organizations())
            .finish()
    }
}
