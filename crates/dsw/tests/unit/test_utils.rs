//! Fixtures shared by the facade tests

#![allow(dead_code)]

use std::io::Write;
use std::time::Duration;

use dsw::infrastructure::config::ProviderEndpointConfig;
use dsw::{AppConfig, AppContext};
use serde_json::json;
use tempfile::NamedTempFile;

/// Configuration pointing both adapters at the given servers
pub fn config_for(legacy_url: &str, salesforce_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.providers.legacy = ProviderEndpointConfig::new("legacy-http", legacy_url);
    config.providers.salesforce = ProviderEndpointConfig::new("salesforce-http", salesforce_url);
    config.routing.retry_delay_ms = 1;
    config
}

pub fn payload_file() -> NamedTempFile {
    let payload = json!({
        "deposit_reference": "TEN-42",
        "deposit_amount": 1200.0,
        "rent_amount": 950.5,
        "tenancy_start_date": "2026-04-01",
        "tenancy_end_date": "2027-03-31",
        "property": {
            "line1": "1 High Street",
            "line2": null,
            "town": "Leeds",
            "postcode": "LS1 1AA"
        },
        "landlord": { "first_name": "Lena", "last_name": "Lord", "email": null, "phone": null },
        "tenants": [
            { "first_name": "Tom", "last_name": "Tenant", "email": "tom@example.com", "phone": null }
        ]
    });
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(payload.to_string().as_bytes()).unwrap();
    file
}

pub fn legacy_body(dan: &str) -> String {
    json!({
        "success": true,
        "dan": dan,
        "status": "Registered",
        "tenancy_reference": "TEN-42"
    })
    .to_string()
}

pub fn salesforce_body(dan: &str) -> String {
    json!({
        "Id": "a0X000001",
        "DAN__c": dan,
        "Status__c": "registered",
        "Deposit_Reference__c": "TEN-42"
    })
    .to_string()
}

/// Wait for the telemetry worker to persist `count` comparisons
pub async fn wait_for_comparisons(context: &AppContext, count: usize) {
    for _ in 0..100 {
        if context.comparisons.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "expected {count} comparison(s), found {}",
        context.comparisons.len()
    );
}
