//! Deposit Gateway Use Case
//!
//! Entry point for one create/status request: admission, configuration,
//! routing and execution, tracked through a [`RequestLifecycle`].

use crate::use_cases::configuration_store::ConfigurationStore;
use crate::use_cases::dual_execution::{DualExecutionCoordinator, ExecutionContext, ProviderStatusReport};
use crate::use_cases::lifecycle::{RequestLifecycle, RequestPhase};
use crate::use_cases::rate_limiter::RateLimiter;
use crate::use_cases::routing_engine::RoutingDecisionEngine;
use dsw_domain::constants::HTTP_TOO_MANY_REQUESTS;
use dsw_domain::error::{Error, Result};
use dsw_domain::value_objects::{
    AdmissionDecision, DepositAction, EffectiveConfig, ExecutionPlan, ExecutionReport,
    OrgCredentials, OrganizationKey, ProviderPreference,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// One inbound deposit request
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    /// Calling integration, used for rate limiting
    pub integration: String,
    /// Organization branch the request is made for
    pub organization: OrganizationKey,
    /// Organization provider preference
    pub preference: ProviderPreference,
    /// Credentials forwarded to the backends
    pub credentials: OrgCredentials,
    /// Requested operation
    pub action: DepositAction,
}

/// Result of handling a request
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GatewayResponse {
    /// Rejected by the rate limiter
    Throttled {
        /// HTTP status to answer with
        status: u16,
        /// `X-RateLimit-Limit` and `Retry-After`
        headers: Vec<(&'static str, String)>,
        /// Limiter decision
        decision: AdmissionDecision,
    },
    /// Executed against the backend(s)
    Completed {
        /// Request identifier
        request_id: Uuid,
        /// Execution report
        report: ExecutionReport,
        /// Limiter decision, for `X-RateLimit-*` headers
        rate_limit: AdmissionDecision,
    },
}

/// Orchestrates rate limiting, configuration, routing and execution
#[derive(Debug, Clone)]
pub struct DepositGateway {
    rate_limiter: Arc<RateLimiter>,
    config_store: Arc<ConfigurationStore>,
    engine: RoutingDecisionEngine,
    coordinator: Arc<DualExecutionCoordinator>,
}

impl DepositGateway {
    /// Create a gateway from its collaborators
    pub fn new(
        rate_limiter: Arc<RateLimiter>,
        config_store: Arc<ConfigurationStore>,
        engine: RoutingDecisionEngine,
        coordinator: Arc<DualExecutionCoordinator>,
    ) -> Self {
        Self {
            rate_limiter,
            config_store,
            engine,
            coordinator,
        }
    }

    /// Rate limiter, for administration
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    /// Configuration store, for administration
    pub fn config_store(&self) -> &Arc<ConfigurationStore> {
        &self.config_store
    }

    /// Effective configuration and plan for an organization, without executing
    pub async fn plan(
        &self,
        organization: &OrganizationKey,
        preference: ProviderPreference,
    ) -> Result<(EffectiveConfig, ExecutionPlan)> {
        let effective = self
            .config_store
            .organization_config(&organization.agency_ref, &organization.branch_id, preference)
            .await?;
        let plan = self.engine.determine_provider(&effective);
        Ok((effective, plan))
    }

    /// Handle one request
    ///
    /// Throttling is a response, not an error. A failing single-provider
    /// plan surfaces the provider error; dual plans always complete.
    pub async fn handle(&self, request: &GatewayRequest) -> Result<GatewayResponse> {
        let mut lifecycle = RequestLifecycle::new(Uuid::new_v4());
        let organization_id = request.organization.to_string();

        let decision = self
            .rate_limiter
            .admit(&request.integration, &organization_id)
            .await;
        if !decision.allowed {
            info!(
                request_id = %lifecycle.request_id(),
                integration = %request.integration,
                organization = %organization_id,
                reason = ?decision.reason,
                retry_after = ?decision.retry_after_secs,
                "Request throttled"
            );
            return Ok(GatewayResponse::Throttled {
                status: HTTP_TOO_MANY_REQUESTS,
                headers: decision.headers(),
                decision,
            });
        }

        let (effective, plan) = self.plan(&request.organization, request.preference).await?;
        lifecycle.advance(RequestPhase::Routed)?;
        lifecycle.advance(if plan.is_dual() {
            RequestPhase::ExecutingDual
        } else {
            RequestPhase::ExecutingSingle
        })?;

        let ctx = ExecutionContext {
            request_id: lifecycle.request_id(),
            config: &effective,
            credentials: &request.credentials,
            action: &request.action,
        };
        let report = self.coordinator.execute(&plan, &ctx).await;
        lifecycle.advance(report.state.into())?;
        lifecycle.advance(RequestPhase::Responded)?;

        if !plan.is_dual() && !report.primary.success {
            let error = report.primary.error.clone().map_or_else(
                || Error::internal("failed outcome carried no error"),
                Error::Provider,
            );
            warn!(
                request_id = %lifecycle.request_id(),
                organization = %organization_id,
                error = %error,
                "Request failed"
            );
            return Err(error);
        }

        Ok(GatewayResponse::Completed {
            request_id: lifecycle.request_id(),
            report,
            rate_limit: decision,
        })
    }

    /// Health of every provider
    pub async fn health(&self) -> Vec<ProviderStatusReport> {
        self.coordinator.provider_health().await
    }
}
