//! Provider Adapter Port
//!
//! Uniform interface over the legacy and Salesforce deposit backends.
//! Adapters own the mapping between the standard payload and their wire
//! format, and normalize every failure into a [`ProviderError`].

use crate::error::ProviderError;
use crate::value_objects::{OrgCredentials, ProviderKind, ProviderResponse, StandardDepositPayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health status for a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderHealthStatus {
    /// Provider is functioning normally
    #[default]
    Healthy,
    /// Provider is experiencing issues but still usable
    Degraded,
    /// Provider is not available
    Unhealthy,
}

/// Result of a provider health probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderHealth {
    /// Probed provider
    pub provider: ProviderKind,
    /// Observed status
    pub status: ProviderHealthStatus,
    /// Probe round-trip time
    pub latency_ms: u64,
    /// Failure detail when not healthy
    pub message: Option<String>,
}

/// Deposit backend adapter
///
/// # Example
///
/// ```ignore
/// let body = adapter.transform_payload(&payload)?;
/// let response = adapter.create(&body, &credentials).await?;
/// println!("registered as {:?}", response.external_id);
/// ```
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which backend this adapter talks to
    fn kind(&self) -> ProviderKind;

    /// Map the standard payload into this backend's request body
    fn transform_payload(&self, payload: &StandardDepositPayload) -> Result<Value, ProviderError>;

    /// Register a deposit using an already transformed body
    async fn create(
        &self,
        body: &Value,
        credentials: &OrgCredentials,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Poll the status of a registered deposit
    async fn status(
        &self,
        external_id: &str,
        credentials: &OrgCredentials,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Probe backend availability
    async fn health_check(&self) -> ProviderHealth;
}
