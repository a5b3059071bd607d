//! Legacy Deposit Adapter
//!
//! Talks to the current production deposit API. The legacy wire format
//! nests the tenancy under `tenancy`, lists every party in a flat `people`
//! array tagged by classification, formats dates as `dd/mm/yyyy` and sends
//! amounts as two-decimal strings.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use dsw_application::ports::{PROVIDER_ADAPTERS, ProviderAdapterConfig, ProviderAdapterEntry};
use dsw_domain::error::{ProviderError, ProviderOperation};
use dsw_domain::ports::{ProviderAdapter, ProviderHealth};
use dsw_domain::value_objects::{
    OrgCredentials, Party, ProviderKind, ProviderResponse, StandardDepositPayload,
};

use crate::constants::{
    CONTENT_TYPE_JSON, CREATE_DEPOSIT_PATH, DEPOSIT_STATUS_PATH, HEADER_BRANCH_ID,
    HEADER_MEMBER_ID, HEADER_MEMBER_KEY, HEADER_SERVICE_KEY, LEGACY_DATE_FORMAT,
    LEGACY_JOINT_TENANT, LEGACY_LANDLORD, LEGACY_LEAD_TENANT,
};
use crate::deposit::helpers::{self, constructor};
use crate::utils::HttpResponseUtils;

const KIND: ProviderKind = ProviderKind::Legacy;

/// Legacy backend response envelope
#[derive(Debug, Deserialize)]
struct LegacyEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    dan: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    tenancy_reference: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Legacy deposit backend adapter
///
/// Receives its HTTP client via constructor injection.
pub struct LegacyDepositAdapter {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http_client: Client,
}

impl LegacyDepositAdapter {
    /// Create a new legacy adapter
    ///
    /// # Arguments
    /// * `base_url` - Backend base URL, without the endpoint path
    /// * `api_key` - Optional service key sent on every request
    /// * `timeout` - Client-side request timeout
    /// * `http_client` - Reqwest client for making API requests
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
        http_client: Client,
    ) -> Self {
        Self {
            base_url: constructor::normalize_base_url(base_url),
            api_key: constructor::normalize_api_key(api_key),
            timeout,
            http_client,
        }
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn person(classification: &str, party: &Party) -> Value {
        json!({
            "person_classification": classification,
            "person_firstname": party.first_name,
            "person_surname": party.last_name,
            "person_email": party.email,
            "person_mobile": party.phone,
        })
    }

    fn post(&self, path: &str, credentials: &OrgCredentials) -> RequestBuilder {
        let mut request = self
            .http_client
            .post(format!("{}{path}", self.base_url))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header(HEADER_MEMBER_ID, &credentials.member_id)
            .header(HEADER_BRANCH_ID, &credentials.branch_id)
            .header(HEADER_MEMBER_KEY, &credentials.api_key)
            .timeout(self.timeout);
        if let Some(key) = &self.api_key {
            request = request.header(HEADER_SERVICE_KEY, key);
        }
        request
    }

    async fn send(
        &self,
        path: &str,
        body: &Value,
        credentials: &OrgCredentials,
        operation: ProviderOperation,
    ) -> Result<ProviderResponse, ProviderError> {
        let response = self
            .post(path, credentials)
            .json(body)
            .send()
            .await
            .map_err(|e| HttpResponseUtils::send_error(&e, KIND, operation, self.timeout))?;

        let (status_code, body) = HttpResponseUtils::check_and_parse(response, KIND, operation).await?;
        Self::normalize(status_code, body, operation)
    }

    /// The legacy API reports business failures inside a 200 envelope
    fn normalize(
        status_code: u16,
        body: Value,
        operation: ProviderOperation,
    ) -> Result<ProviderResponse, ProviderError> {
        let envelope: LegacyEnvelope = serde_json::from_value(body).map_err(|e| {
            ProviderError::validation(KIND, operation, format!("unexpected response shape: {e}"))
        })?;

        if envelope.success == Some(false) {
            return Err(ProviderError::application(
                KIND,
                operation,
                Some(status_code),
                envelope
                    .error
                    .unwrap_or_else(|| "request rejected without a reason".to_string()),
            ));
        }

        debug!(provider = %KIND, operation = %operation, dan = ?envelope.dan, "Legacy response received");
        Ok(helpers::normalized_response(
            status_code,
            envelope.status.as_deref(),
            envelope.tenancy_reference.as_deref(),
            envelope.dan,
        ))
    }
}

#[async_trait]
impl ProviderAdapter for LegacyDepositAdapter {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    fn transform_payload(&self, payload: &StandardDepositPayload) -> Result<Value, ProviderError> {
        helpers::validate_payload(KIND, payload)?;

        let mut people = Vec::with_capacity(payload.tenants.len() + 1);
        people.push(Self::person(LEGACY_LANDLORD, &payload.landlord));
        for (idx, tenant) in payload.tenants.iter().enumerate() {
            let classification = if idx == 0 {
                LEGACY_LEAD_TENANT
            } else {
                LEGACY_JOINT_TENANT
            };
            people.push(Self::person(classification, tenant));
        }

        Ok(json!({
            "tenancy": {
                "reference": payload.deposit_reference,
                "deposit_amount": format!("{:.2}", payload.deposit_amount),
                "rent_amount": format!("{:.2}", payload.rent_amount),
                "start_date": payload.tenancy_start_date.format(LEGACY_DATE_FORMAT).to_string(),
                "end_date": payload
                    .tenancy_end_date
                    .map(|d| d.format(LEGACY_DATE_FORMAT).to_string()),
                "property": {
                    "address_1": payload.property.line1,
                    "address_2": payload.property.line2,
                    "town": payload.property.town,
                    "postcode": payload.property.postcode,
                },
            },
            "people": people,
        }))
    }

    async fn create(
        &self,
        body: &Value,
        credentials: &OrgCredentials,
    ) -> Result<ProviderResponse, ProviderError> {
        self.send(CREATE_DEPOSIT_PATH, body, credentials, ProviderOperation::Create)
            .await
    }

    async fn status(
        &self,
        external_id: &str,
        credentials: &OrgCredentials,
    ) -> Result<ProviderResponse, ProviderError> {
        let body = json!({ "dan": external_id });
        self.send(DEPOSIT_STATUS_PATH, &body, credentials, ProviderOperation::Status)
            .await
    }

    async fn health_check(&self) -> ProviderHealth {
        helpers::probe_health(&self.http_client, &self.base_url, KIND, self.timeout).await
    }
}

// ============================================================================
// Auto-registration via linkme
// ============================================================================

#[linkme::distributed_slice(PROVIDER_ADAPTERS)]
static LEGACY_HTTP_ADAPTER: ProviderAdapterEntry = ProviderAdapterEntry {
    name: "legacy-http",
    kind: ProviderKind::Legacy,
    description: "Legacy deposit registration API over HTTP",
    factory: legacy_factory,
};

fn legacy_factory(
    config: &ProviderAdapterConfig,
) -> Result<Arc<dyn ProviderAdapter>, String> {
    if config.base_url.trim().is_empty() {
        return Err("legacy-http requires base_url".to_string());
    }
    let http_client = constructor::build_client(config.timeout)?;
    Ok(Arc::new(LegacyDepositAdapter::new(
        &config.base_url,
        config.api_key.clone(),
        config.timeout,
        http_client,
    )))
}
