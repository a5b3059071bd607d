//! Composition root
//!
//! Builds a [`DepositGateway`] from an [`AppConfig`]:
//!
//! ```text
//! AppConfig -> stores (seeded) -> ConfigurationStore / RateLimiter
//!           -> linkme registry -> ProviderRegistry -> DualExecutionCoordinator
//!                                 TelemetryDispatcher ↗
//! ```

use crate::clock::{SystemClock, ThreadRandom};
use crate::config::AppConfig;
use crate::stores::{
    InMemoryComparisonStore, InMemoryRateLimitConfigStore, InMemoryRoutingSettingsSource,
};
use crate::telemetry::{TelemetryDispatcher, TelemetryStats};
use dsw_application::ports::ProviderRegistry;
use dsw_application::use_cases::{
    ConfigurationStore, DepositGateway, DualExecutionCoordinator, RateLimiter,
    RoutingDecisionEngine,
};
use dsw_domain::error::Result;
use dsw_domain::ports::{Clock, ComparisonStore};
use std::sync::Arc;
use tracing::info;

/// Wired application
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Configuration the context was built from
    pub config: Arc<AppConfig>,
    /// Request entry point
    pub gateway: DepositGateway,
    /// Persisted comparison records
    pub comparisons: Arc<InMemoryComparisonStore>,
    /// Telemetry worker counters
    pub telemetry: Arc<TelemetryStats>,
}

/// Build the application context
///
/// Must be called from within a tokio runtime; the telemetry worker is
/// spawned here.
pub fn init_app(config: AppConfig) -> Result<AppContext> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let registry = ProviderRegistry::resolve(
        &config.providers.legacy.to_adapter_config(),
        &config.providers.salesforce.to_adapter_config(),
    )?;

    let settings = Arc::new(InMemoryRoutingSettingsSource::new(config.routing.clone()));
    let config_store = Arc::new(ConfigurationStore::with_ttl(
        settings,
        Arc::clone(&clock),
        config.cache.routing_ttl(),
    ));

    let limits = Arc::new(InMemoryRateLimitConfigStore::from_rules(
        &config.rate_limit.rules,
    ));
    let rate_limiter = Arc::new(RateLimiter::with_config_ttl(
        limits,
        Arc::clone(&clock),
        config.cache.rate_limit_ttl(),
    ));

    let comparisons = Arc::new(InMemoryComparisonStore::new());
    let sink_store: Arc<dyn ComparisonStore> = comparisons.clone();
    let (dispatcher, _worker) = TelemetryDispatcher::spawn(sink_store);
    let telemetry = dispatcher.stats();

    let coordinator = Arc::new(DualExecutionCoordinator::new(
        Arc::new(registry),
        Arc::new(dispatcher),
        clock,
    ));
    let engine = RoutingDecisionEngine::new(Arc::new(ThreadRandom));
    let gateway = DepositGateway::new(rate_limiter, config_store, engine, coordinator);

    info!(
        legacy = %config.providers.legacy.adapter,
        salesforce = %config.providers.salesforce.adapter,
        routing_mode = %config.routing.routing_mode,
        rate_limit_rules = config.rate_limit.rules.len(),
        "Deposit gateway initialized"
    );

    Ok(AppContext {
        config: Arc::new(config),
        gateway,
        comparisons,
        telemetry,
    })
}
