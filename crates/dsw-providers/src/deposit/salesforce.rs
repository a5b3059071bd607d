//! Salesforce Deposit Adapter
//!
//! Talks to the Salesforce deposit API that traffic is being migrated to.
//! Field names follow Salesforce custom-field conventions (`__c`), dates
//! are ISO 8601 and amounts are numbers.

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
    CONTENT_TYPE_JSON, CREATE_DEPOSIT_PATH, DEPOSIT_STATUS_PATH, HEADER_SERVICE_KEY,
    HEADER_SF_ORGANIZATION, SALESFORCE_DATE_FORMAT,
};
use crate::deposit::helpers::{self, constructor};
use crate::utils::HttpResponseUtils;

const KIND: ProviderKind = ProviderKind::New;

/// Salesforce deposit record as returned by the API
#[derive(Debug, Deserialize)]
struct SalesforceRecord {
    #[serde(rename = "Id", default)]
    id: Option<String>,
    #[serde(rename = "DAN__c", default)]
    dan: Option<String>,
    #[serde(rename = "Status__c", default)]
    status: Option<String>,
    #[serde(rename = "Deposit_Reference__c", default)]
    deposit_reference: Option<String>,
}

/// Salesforce deposit backend adapter
pub struct SalesforceDepositAdapter {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http_client: Client,
}

impl SalesforceDepositAdapter {
    /// Create a new Salesforce adapter
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

    fn contact(party: &Party) -> Value {
        json!({
            "First_Name__c": party.first_name,
            "Last_Name__c": party.last_name,
            "Email__c": party.email,
            "Phone__c": party.phone,
        })
    }

    fn street(payload: &StandardDepositPayload) -> String {
        match payload.property.line2.as_deref().map(str::trim) {
            Some(line2) if !line2.is_empty() => format!("{}\n{line2}", payload.property.line1),
            _ => payload.property.line1.clone(),
        }
    }

    fn post(&self, path: &str, credentials: &OrgCredentials) -> RequestBuilder {
        let mut request = self
            .http_client
            .post(format!("{}{path}", self.base_url))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .header("Authorization", format!("Bearer {}", credentials.api_key))
            .header(
                HEADER_SF_ORGANIZATION,
                format!("{}:{}", credentials.member_id, credentials.branch_id),
            )
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

        let (status_code, body) =
            HttpResponseUtils::check_and_parse(response, KIND, operation).await?;
        let record: SalesforceRecord = serde_json::from_value(body).map_err(|e| {
            ProviderError::validation(KIND, operation, format!("unexpected response shape: {e}"))
        })?;

        debug!(provider = %KIND, operation = %operation, record_id = ?record.id, dan = ?record.dan, "Salesforce response received");
        Ok(helpers::normalized_response(
            status_code,
            record.status.as_deref(),
            record.deposit_reference.as_deref(),
            record.dan,
        ))
    }
}

#[async_trait]
impl ProviderAdapter for SalesforceDepositAdapter {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    fn transform_payload(&self, payload: &StandardDepositPayload) -> Result<Value, ProviderError> {
        helpers::validate_payload(KIND, payload)?;

        let tenants: Vec<Value> = payload.tenants.iter().map(Self::contact).collect();
        Ok(json!({
            "Deposit_Reference__c": payload.deposit_reference,
            "Deposit_Amount__c": payload.deposit_amount,
            "Rent_Amount__c": payload.rent_amount,
            "Tenancy_Start_Date__c": payload.tenancy_start_date.format(SALESFORCE_DATE_FORMAT).to_string(),
            "Tenancy_End_Date__c": payload
                .tenancy_end_date
                .map(|d| d.format(SALESFORCE_DATE_FORMAT).to_string()),
            "Property__c": {
                "Street__c": Self::street(payload),
                "City__c": payload.property.town,
                "Postal_Code__c": payload.property.postcode,
            },
            "Landlord__c": Self::contact(&payload.landlord),
            "Tenants__c": tenants,
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
        let body = json!({ "DAN__c": external_id });
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
static SALESFORCE_HTTP_ADAPTER: ProviderAdapterEntry = ProviderAdapterEntry {
    name: "salesforce-http",
    kind: ProviderKind::New,
    description: "Salesforce deposit registration API over HTTP",
    factory: salesforce_factory,
};

fn salesforce_factory(
    config: &ProviderAdapterConfig,
) -> Result<Arc<dyn ProviderAdapter>, String> {
    if config.base_url.trim().is_empty() {
        return Err("salesforce-http requires base_url".to_string());
    }
    let http_client = constructor::build_client(config.timeout)?;
    Ok(Arc::new(SalesforceDepositAdapter::new(
        &config.base_url,
        config.api_key.clone(),
        config.timeout,
        http_client,
    )))
}
