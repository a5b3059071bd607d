//! Tests for routing value objects

use dsw_domain::error::Error;
use dsw_domain::value_objects::{
    ExecutionPlan, ProviderKind, ProviderPreference, RoutingMode, RoutingTarget,
};

// ============================================================================
// Routing Mode Tests
// ============================================================================

#[test]
fn test_routing_mode_labels_round_trip() {
    for mode in RoutingMode::ALL {
        let parsed: RoutingMode = mode.as_str().parse().expect("valid label");
        assert_eq!(parsed, mode);
    }
}

#[test]
fn test_routing_mode_rejects_unknown_label() {
    let err = "canary".parse::<RoutingMode>().unwrap_err();
    assert!(matches!(err, Error::ConfigValidation { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_routing_mode_is_case_sensitive() {
    assert!("Legacy-Only".parse::<RoutingMode>().is_err());
    assert!("legacy_only".parse::<RoutingMode>().is_err());
}

#[test]
fn test_routing_mode_serde_uses_kebab_case() {
    let json = serde_json::to_string(&RoutingMode::SalesforceOnly).unwrap();
    assert_eq!(json, "\"salesforce-only\"");
}

// ============================================================================
// Provider Identity Tests
// ============================================================================

#[test]
fn test_provider_kind_parse() {
    assert_eq!("legacy".parse::<ProviderKind>().unwrap(), ProviderKind::Legacy);
    assert_eq!("new".parse::<ProviderKind>().unwrap(), ProviderKind::New);
    assert!("salesforce".parse::<ProviderKind>().is_err());
}

#[test]
fn test_provider_preference_parse() {
    assert_eq!(
        "dual".parse::<ProviderPreference>().unwrap(),
        ProviderPreference::Dual
    );
    assert_eq!(ProviderPreference::default(), ProviderPreference::Auto);
    let err = "both".parse::<ProviderPreference>().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

// ============================================================================
// Execution Plan Tests
// ============================================================================

#[test]
fn test_single_plan_targets_its_provider() {
    let plan = ExecutionPlan::single(ProviderKind::New);
    assert_eq!(plan.target, RoutingTarget::New);
    assert_eq!(plan.execute, vec![ProviderKind::New]);
    assert_eq!(plan.return_from, None);
    assert!(!plan.is_dual());
}

#[test]
fn test_dual_plan_without_return_from_targets_both() {
    let plan = ExecutionPlan::dual(None);
    assert_eq!(plan.target, RoutingTarget::Both);
    assert_eq!(plan.execute, vec![ProviderKind::Legacy, ProviderKind::New]);
    assert!(plan.is_dual());
}

#[test]
fn test_shadow_style_plan_targets_returned_provider() {
    let plan = ExecutionPlan::dual(Some(ProviderKind::Legacy));
    assert_eq!(plan.target, RoutingTarget::Legacy);
    assert_eq!(plan.return_from, Some(ProviderKind::Legacy));
    assert!(plan.is_dual());
}
