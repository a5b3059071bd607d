//! Tests for the Salesforce deposit adapter

use crate::test_utils::{TIMEOUT, client, credentials, payload};
use dsw_domain::error::ProviderErrorKind;
use dsw_domain::ports::{ProviderAdapter, ProviderHealthStatus};
use dsw_domain::value_objects::ProviderKind;
use dsw_providers::SalesforceDepositAdapter;
use mockito::{Matcher, Server};
use serde_json::json;

fn adapter(base_url: &str) -> SalesforceDepositAdapter {
    SalesforceDepositAdapter::new(base_url, None, TIMEOUT, client())
}

// ============================================================================
// Payload Mapping
// ============================================================================

#[test]
fn test_salesforce_transform_uses_custom_fields() {
    let body = adapter("http://localhost").transform_payload(&payload()).unwrap();

    assert_eq!(body["Deposit_Reference__c"], "TEN-42");
    assert_eq!(body["Deposit_Amount__c"], 1200.0);
    assert_eq!(body["Rent_Amount__c"], 950.5);
    assert_eq!(body["Tenancy_Start_Date__c"], "2026-04-01");
    assert_eq!(body["Tenancy_End_Date__c"], "2027-03-31");
    assert_eq!(body["Property__c"]["Street__c"], "1 High Street\nFlat 2");
    assert_eq!(body["Property__c"]["City__c"], "Leeds");
    assert_eq!(body["Landlord__c"]["Last_Name__c"], "Lord");
    assert_eq!(body["Tenants__c"].as_array().unwrap().len(), 2);
    assert_eq!(body["Tenants__c"][1]["First_Name__c"], "Jo");
}

#[test]
fn test_salesforce_street_without_second_line() {
    let mut payload = payload();
    payload.property.line2 = Some("   ".to_string());
    let body = adapter("http://localhost").transform_payload(&payload).unwrap();
    assert_eq!(body["Property__c"]["Street__c"], "1 High Street");
}

#[test]
fn test_salesforce_transform_rejects_missing_postcode() {
    let mut payload = payload();
    payload.property.postcode = String::new();
    let err = adapter("http://localhost")
        .transform_payload(&payload)
        .unwrap_err();
    assert_eq!(err.provider, ProviderKind::New);
    assert_eq!(err.kind, ProviderErrorKind::Validation);
}

// ============================================================================
// HTTP Calls
// ============================================================================

#[tokio::test]
async fn test_salesforce_create_authenticates_and_normalizes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/create-deposit-equivalent")
        .match_header("authorization", "Bearer member-key")
        .match_header("x-sf-organization", "M100:B7")
        .match_body(Matcher::PartialJson(json!({"Deposit_Reference__c": "TEN-42"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "Id": "a0X000000001",
                "DAN__c": "DAN0001",
                "Status__c": "REGISTERED",
                "Deposit_Reference__c": "TEN-42"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let adapter = adapter(&server.url());
    let body = adapter.transform_payload(&payload()).unwrap();
    let response = adapter.create(&body, &credentials()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.status_code, 201);
    assert_eq!(response.external_id.as_deref(), Some("DAN0001"));
    assert_eq!(
        response.body,
        json!({"status": "registered", "deposit_reference": "TEN-42", "dan": "DAN0001"})
    );
}

#[tokio::test]
async fn test_salesforce_missing_status_is_unknown() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/status")
        .match_body(Matcher::Json(json!({"DAN__c": "DAN0001"})))
        .with_status(200)
        .with_body(json!({"DAN__c": "DAN0001"}).to_string())
        .create_async()
        .await;

    let response = adapter(&server.url())
        .status("DAN0001", &credentials())
        .await
        .unwrap();
    assert_eq!(response.body["status"], "unknown");
}

#[tokio::test]
async fn test_salesforce_auth_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/create-deposit-equivalent")
        .with_status(401)
        .with_body(json!([{"errorCode": "INVALID_SESSION_ID"}]).to_string())
        .create_async()
        .await;

    let err = adapter(&server.url())
        .create(&json!({}), &credentials())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ProviderErrorKind::Application);
    assert_eq!(err.status_code, Some(401));
    assert!(err.message.contains("authentication failed"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_salesforce_health_degraded_on_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/health")
        .with_status(500)
        .create_async()
        .await;

    let health = adapter(&server.url()).health_check().await;
    assert_eq!(health.provider, ProviderKind::New);
    assert_eq!(health.status, ProviderHealthStatus::Degraded);
    assert_eq!(health.message.as_deref(), Some("health endpoint returned 500"));
}
