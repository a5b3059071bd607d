//! Provider Adapter Registry
//!
//! Auto-registration system for provider adapters.
//! Adapters register themselves via `linkme` distributed slices and are
//! resolved by name once at startup into a [`ProviderRegistry`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dsw_domain::error::{Error, Result};
use dsw_domain::ports::ProviderAdapter;
use dsw_domain::value_objects::ProviderKind;

/// Configuration for provider adapter creation
///
/// Contains all options an adapter might need. Adapters use what they need
/// and ignore the rest.
#[derive(Debug, Clone)]
pub struct ProviderAdapterConfig {
    /// Registry name of the adapter (e.g., "legacy-http", "salesforce-http")
    pub adapter: String,
    /// Base URL of the backend
    pub base_url: String,
    /// HTTP client timeout; per-call timeouts are applied by the coordinator
    pub timeout: Duration,
    /// Service-level API key sent alongside organization credentials
    pub api_key: Option<String>,
    /// Additional adapter-specific configuration
    pub extra: HashMap<String, String>,
}

impl ProviderAdapterConfig {
    /// Create a new config for the named adapter
    pub fn new(adapter: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            adapter: adapter.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(60),
            api_key: None,
            extra: HashMap::new(),
        }
    }

    /// Set the HTTP client timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the service API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Add extra configuration
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Registry entry for provider adapters
///
/// Each adapter implementation registers itself with this entry. The entry
/// contains metadata and a factory function to create adapter instances.
pub struct ProviderAdapterEntry {
    /// Unique adapter name (e.g., "legacy-http")
    pub name: &'static str,
    /// Backend the adapter talks to
    pub kind: ProviderKind,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create adapter instance
    pub factory: fn(&ProviderAdapterConfig) -> std::result::Result<Arc<dyn ProviderAdapter>, String>,
}

// Auto-collection via linkme distributed slices - adapters submit entries at compile time
#[linkme::distributed_slice]
pub static PROVIDER_ADAPTERS: [ProviderAdapterEntry] = [..];

/// Resolve a provider adapter by name from the registry
///
/// # Returns
/// * `Ok(Arc<dyn ProviderAdapter>)` - Created adapter instance
/// * `Err(String)` - Error message if the adapter is unknown or creation failed
pub fn resolve_provider_adapter(
    config: &ProviderAdapterConfig,
) -> std::result::Result<Arc<dyn ProviderAdapter>, String> {
    PROVIDER_ADAPTERS
        .iter()
        .find(|entry| entry.name == config.adapter)
        .map(|entry| (entry.factory)(config))
        .unwrap_or_else(|| {
            let available: Vec<&str> = PROVIDER_ADAPTERS.iter().map(|e| e.name).collect();
            Err(format!(
                "Unknown provider adapter '{}'. Available adapters: {:?}",
                config.adapter, available
            ))
        })
}

/// List all registered provider adapters as `(name, description)`
pub fn list_provider_adapters() -> Vec<(&'static str, &'static str)> {
    PROVIDER_ADAPTERS
        .iter()
        .map(|entry| (entry.name, entry.description))
        .collect()
}

/// The two adapters a deployment routes between
///
/// Resolved once at startup; request handling only indexes by
/// [`ProviderKind`].
#[derive(Clone)]
pub struct ProviderRegistry {
    legacy: Arc<dyn ProviderAdapter>,
    new: Arc<dyn ProviderAdapter>,
}

impl ProviderRegistry {
    /// Build a registry from adapter instances
    pub fn new(legacy: Arc<dyn ProviderAdapter>, new: Arc<dyn ProviderAdapter>) -> Result<Self> {
        if legacy.kind() != ProviderKind::Legacy {
            return Err(Error::invalid_argument(format!(
                "legacy slot received a {} adapter",
                legacy.kind()
            )));
        }
        if new.kind() != ProviderKind::New {
            return Err(Error::invalid_argument(format!(
                "new slot received a {} adapter",
                new.kind()
            )));
        }
        Ok(Self { legacy, new })
    }

    /// Resolve both adapters from the registered factories
    pub fn resolve(legacy: &ProviderAdapterConfig, new: &ProviderAdapterConfig) -> Result<Self> {
        let legacy = resolve_provider_adapter(legacy).map_err(Error::configuration)?;
        let new = resolve_provider_adapter(new).map_err(Error::configuration)?;
        Self::new(legacy, new)
    }

    /// Adapter for the given provider
    pub fn get(&self, kind: ProviderKind) -> &Arc<dyn ProviderAdapter> {
        match kind {
            ProviderKind::Legacy => &self.legacy,
            ProviderKind::New => &self.new,
        }
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("legacy", &self.legacy.kind())
            .field("new", &self.new.kind())
            .finish()
    }
}
