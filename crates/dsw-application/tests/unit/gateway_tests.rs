//! Tests for the end-to-end request flow

use crate::test_utils::{
    FakeAdapter, FakeRateLimitStore, FakeSettingsSource, ManualClock, RecordingSink,
    SequenceRandom, create_action, credentials, fast_settings, registry,
};
use dsw_application::use_cases::{
    ConfigurationStore, DepositGateway, DualExecutionCoordinator, GatewayRequest,
    GatewayResponse, RateLimiter, RoutingDecisionEngine,
};
use dsw_domain::constants::{HEADER_RETRY_AFTER, HTTP_TOO_MANY_REQUESTS};
use dsw_domain::error::{Error, ProviderError, ProviderOperation};
use dsw_domain::value_objects::{
    ExecutionState, OrganizationKey, ProviderKind, ProviderPreference, RateLimitConfig,
    RateLimitKey, RoutingMode, RoutingSettings,
};
use serde_json::json;
use std::sync::Arc;

fn gateway(
    settings: RoutingSettings,
    limits: Vec<(RateLimitKey, RateLimitConfig)>,
    legacy: FakeAdapter,
    new: FakeAdapter,
) -> DepositGateway {
    let clock = ManualClock::new();
    let rate_limiter = RateLimiter::new(FakeRateLimitStore::with_rows(limits), clock.clone());
    let config_store = ConfigurationStore::new(FakeSettingsSource::new(settings), clock.clone());
    let coordinator = DualExecutionCoordinator::new(
        registry(Arc::new(legacy), Arc::new(new)),
        RecordingSink::new(),
        clock,
    );
    DepositGateway::new(
        Arc::new(rate_limiter),
        Arc::new(config_store),
        RoutingDecisionEngine::new(SequenceRandom::new(vec![10.0])),
        Arc::new(coordinator),
    )
}

fn request(branch: &str, preference: ProviderPreference) -> GatewayRequest {
    GatewayRequest {
        integration: "crm".to_string(),
        organization: OrganizationKey::new("agency-x", branch),
        preference,
        credentials: credentials(),
        action: create_action(),
    }
}

fn healthy(kind: ProviderKind) -> FakeAdapter {
    FakeAdapter::ok(kind, json!({"status": "registered"}))
}

fn broken(kind: ProviderKind) -> FakeAdapter {
    FakeAdapter::failing(
        kind,
        ProviderError::application(kind, ProviderOperation::Create, Some(500), "backend error"),
    )
}

#[tokio::test]
async fn test_dual_preference_completes_with_new_result() {
    let gateway = gateway(
        fast_settings("legacy-only"),
        Vec::new(),
        healthy(ProviderKind::Legacy),
        healthy(ProviderKind::New),
    );

    let response = gateway
        .handle(&request("branch-1", ProviderPreference::Dual))
        .await
        .unwrap();

    match response {
        GatewayResponse::Completed { report, rate_limit, .. } => {
            assert_eq!(report.mode, RoutingMode::Both);
            assert_eq!(report.provider, ProviderKind::New);
            assert!(report.comparison.unwrap().is_match());
            assert!(rate_limit.allowed);
        }
        GatewayResponse::Throttled { .. } => panic!("request should not be throttled"),
    }
}

#[tokio::test]
async fn test_throttled_request_short_circuits() {
    let gateway = gateway(
        fast_settings("legacy-only"),
        vec![(
            RateLimitKey::new("crm", "agency-x:branch-1"),
            RateLimitConfig::new(1, 100, 0),
        )],
        healthy(ProviderKind::Legacy),
        healthy(ProviderKind::New),
    );

    gateway
        .handle(&request("branch-1", ProviderPreference::Auto))
        .await
        .unwrap();
    let response = gateway
        .handle(&request("branch-1", ProviderPreference::Auto))
        .await
        .unwrap();

    match response {
        GatewayResponse::Throttled { status, headers, decision } => {
            assert_eq!(status, HTTP_TOO_MANY_REQUESTS);
            assert!(headers.iter().any(|(name, _)| *name == HEADER_RETRY_AFTER));
            assert!(!decision.allowed);
        }
        GatewayResponse::Completed { .. } => panic!("second request should be throttled"),
    }

    let other_branch = gateway
        .handle(&request("branch-2", ProviderPreference::Auto))
        .await
        .unwrap();
    assert!(matches!(other_branch, GatewayResponse::Completed { .. }));
}

#[tokio::test]
async fn test_single_provider_failure_surfaces_provider_error() {
    let gateway = gateway(
        fast_settings("legacy-only"),
        Vec::new(),
        broken(ProviderKind::Legacy),
        healthy(ProviderKind::New),
    );

    let err = gateway
        .handle(&request("branch-1", ProviderPreference::Auto))
        .await
        .unwrap_err();

    let provider_error = err.as_provider().expect("provider error");
    assert_eq!(provider_error.provider, ProviderKind::Legacy);
    assert_eq!(provider_error.status_code, Some(500));
}

#[tokio::test]
async fn test_dual_total_failure_still_completes() {
    let gateway = gateway(
        fast_settings("both"),
        Vec::new(),
        broken(ProviderKind::Legacy),
        broken(ProviderKind::New),
    );

    let response = gateway
        .handle(&request("branch-1", ProviderPreference::Auto))
        .await
        .unwrap();

    match response {
        GatewayResponse::Completed { report, .. } => {
            assert_eq!(report.state, ExecutionState::Failed);
            assert_eq!(report.diagnostics.len(), 1);
        }
        GatewayResponse::Throttled { .. } => panic!("request should not be throttled"),
    }
}

#[tokio::test]
async fn test_invalid_configuration_aborts_request() {
    let gateway = gateway(
        fast_settings("sideways"),
        Vec::new(),
        healthy(ProviderKind::Legacy),
        healthy(ProviderKind::New),
    );

    let err = gateway
        .handle(&request("branch-1", ProviderPreference::Auto))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConfigValidation { .. }));
}

#[tokio::test]
async fn test_plan_without_execution() {
    let gateway = gateway(
        fast_settings("shadow"),
        Vec::new(),
        healthy(ProviderKind::Legacy),
        healthy(ProviderKind::New),
    );

    let (effective, plan) = gateway
        .plan(
            &OrganizationKey::new("agency-x", "branch-1"),
            ProviderPreference::Current,
        )
        .await
        .unwrap();

    assert_eq!(effective.routing_mode(), RoutingMode::LegacyOnly);
    assert_eq!(plan.execute, vec![ProviderKind::Legacy]);
}

#[tokio::test]
async fn test_health_lists_both_providers() {
    let gateway = gateway(
        fast_settings("legacy-only"),
        Vec::new(),
        healthy(ProviderKind::Legacy),
        broken(ProviderKind::New),
    );

    let health = gateway.health().await;
    assert_eq!(health.len(), 2);
}
