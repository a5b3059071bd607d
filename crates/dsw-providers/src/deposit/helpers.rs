//! Common helpers for deposit adapters

use crate::constants::{HEALTH_PATH, STATUS_UNKNOWN};
use dsw_domain::error::{ProviderError, ProviderOperation};
use dsw_domain::ports::{ProviderHealth, ProviderHealthStatus};
use dsw_domain::value_objects::{ProviderKind, ProviderResponse, StandardDepositPayload};
use reqwest::Client;
use serde_json::json;
use std::time::{Duration, Instant};

/// Constructor helpers shared by the adapters
pub mod constructor {
    use reqwest::Client;
    use std::time::Duration;

    /// Trim whitespace and trailing slashes so paths can be appended
    pub fn normalize_base_url(url: &str) -> String {
        url.trim().trim_end_matches('/').to_string()
    }

    /// Drop blank API keys
    pub fn normalize_api_key(api_key: Option<String>) -> Option<String> {
        api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    /// Build the HTTP client used by an adapter factory
    pub fn build_client(timeout: Duration) -> Result<Client, String> {
        Client::builder()
            .timeout(timeout)
            .user_agent(format!("dsw/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {e}"))
    }
}

/// Checks both backends apply before a payload is mapped
pub fn validate_payload(
    provider: ProviderKind,
    payload: &StandardDepositPayload,
) -> Result<(), ProviderError> {
    let invalid = |message: &str| {
        Err(ProviderError::validation(
            provider,
            ProviderOperation::Transform,
            message,
        ))
    };

    if payload.deposit_reference.trim().is_empty() {
        return invalid("deposit reference is required");
    }
    if !(payload.deposit_amount.is_finite() && payload.deposit_amount > 0.0) {
        return invalid("deposit amount must be positive");
    }
    if !(payload.rent_amount.is_finite() && payload.rent_amount > 0.0) {
        return invalid("rent amount must be positive");
    }
    if payload.tenants.is_empty() {
        return invalid("at least one tenant is required");
    }
    if payload
        .tenancy_end_date
        .is_some_and(|end| end < payload.tenancy_start_date)
    {
        return invalid("tenancy end date precedes start date");
    }
    if payload.property.postcode.trim().is_empty() {
        return invalid("property postcode is required");
    }
    Ok(())
}

/// Build a response in the normalized body shape
pub fn normalized_response(
    status_code: u16,
    status: Option<&str>,
    deposit_reference: Option<&str>,
    dan: Option<String>,
) -> ProviderResponse {
    let status = status.map_or_else(|| STATUS_UNKNOWN.to_string(), |s| s.trim().to_lowercase());
    ProviderResponse {
        status_code,
        body: json!({
            "status": status,
            "deposit_reference": deposit_reference,
            "dan": dan,
        }),
        external_id: dan,
    }
}

/// Milliseconds elapsed since `started`
pub fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Probe `{base_url}/health`
///
/// 2xx is healthy, any other answer degraded, no answer unhealthy.
pub async fn probe_health(
    client: &Client,
    base_url: &str,
    provider: ProviderKind,
    timeout: Duration,
) -> ProviderHealth {
    let started = Instant::now();
    let result = client
        .get(format!("{base_url}{HEALTH_PATH}"))
        .timeout(timeout)
        .send()
        .await;
    let latency_ms = elapsed_ms(started);

    let (status, message) = match result {
        Ok(response) if response.status().is_success() => (ProviderHealthStatus::Healthy, None),
        Ok(response) => (
            ProviderHealthStatus::Degraded,
            Some(format!("health endpoint returned {}", response.status().as_u16())),
        ),
        Err(e) => (ProviderHealthStatus::Unhealthy, Some(e.to_string())),
    };

    ProviderHealth {
        provider,
        status,
        latency_ms,
        message,
    }
}
