//! Dual Execution Use Case
//!
//! Executes a routing plan against one or both provider adapters. Each
//! provider call runs under its own timeout, retry policy and circuit
//! breaker, and its failure is captured as an [`Outcome`] instead of being
//! propagated, so the coordinator always produces an [`ExecutionReport`].

use crate::ports::ProviderRegistry;
use crate::use_cases::circuit_breaker::{CircuitBreaker, CircuitState};
use crate::use_cases::comparison::compare_responses;
use crate::use_cases::retry::with_retry;
use dsw_domain::error::{ProviderError, ProviderOperation};
use dsw_domain::ports::{Clock, ComparisonRecord, ComparisonSink, ProviderAdapter, ProviderHealth};
use dsw_domain::value_objects::{
    ComparisonResult, DepositAction, EffectiveConfig, ExecutionPlan, ExecutionReport,
    ExecutionState, OrgCredentials, Outcome, ProviderKind, ProviderResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Everything a plan execution needs besides the plan itself
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    /// Request identifier, carried into telemetry
    pub request_id: Uuid,
    /// Effective configuration the plan was derived from
    pub config: &'a EffectiveConfig,
    /// Credentials forwarded to the adapters
    pub credentials: &'a OrgCredentials,
    /// Requested operation
    pub action: &'a DepositAction,
}

/// Health of one provider as seen by the coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatusReport {
    /// Provider
    pub provider: ProviderKind,
    /// Result of the adapter's own probe
    pub health: ProviderHealth,
    /// Circuit breaker state
    pub circuit: CircuitState,
}

/// Adapter call prepared once per provider and replayed across retries
#[derive(Clone, Copy)]
enum PreparedCall<'a> {
    Create(&'a Value),
    Status(&'a str),
}

impl PreparedCall<'_> {
    fn operation(self) -> ProviderOperation {
        match self {
            Self::Create(_) => ProviderOperation::Create,
            Self::Status(_) => ProviderOperation::Status,
        }
    }
}

/// Coordinates single and dual provider execution
pub struct DualExecutionCoordinator {
    registry: Arc<ProviderRegistry>,
    sink: Arc<dyn ComparisonSink>,
    clock: Arc<dyn Clock>,
    legacy_breaker: CircuitBreaker,
    new_breaker: CircuitBreaker,
}

impl DualExecutionCoordinator {
    /// Create a coordinator over a resolved registry
    pub fn new(
        registry: Arc<ProviderRegistry>,
        sink: Arc<dyn ComparisonSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            legacy_breaker: CircuitBreaker::new(ProviderKind::Legacy, Arc::clone(&clock)),
            new_breaker: CircuitBreaker::new(ProviderKind::New, Arc::clone(&clock)),
            registry,
            sink,
            clock,
        }
    }

    /// Circuit breaker guarding a provider
    pub fn breaker(&self, kind: ProviderKind) -> &CircuitBreaker {
        match kind {
            ProviderKind::Legacy => &self.legacy_breaker,
            ProviderKind::New => &self.new_breaker,
        }
    }

    /// Execute a plan; never fails
    pub async fn execute(&self, plan: &ExecutionPlan, ctx: &ExecutionContext<'_>) -> ExecutionReport {
        let report = if plan.is_dual() {
            self.execute_dual(plan, ctx).await
        } else {
            let kind = plan.execute.first().copied().unwrap_or(ProviderKind::Legacy);
            self.execute_single(plan, kind, ctx).await
        };

        info!(
            request_id = %ctx.request_id,
            mode = %report.mode,
            action = ctx.action.name(),
            provider = %report.provider,
            state = ?report.state,
            fallback_used = report.fallback_used,
            "Execution completed"
        );
        report
    }

    async fn execute_single(
        &self,
        plan: &ExecutionPlan,
        kind: ProviderKind,
        ctx: &ExecutionContext<'_>,
    ) -> ExecutionReport {
        let features = ctx.config.config.features;
        let outcome = self.call_provider(kind, ctx).await;

        if !outcome.success && kind == ProviderKind::New && features.fallback {
            warn!(
                request_id = %ctx.request_id,
                error = ?outcome.error,
                "New provider failed, falling back to legacy"
            );
            let legacy = self.call_provider(ProviderKind::Legacy, ctx).await;
            let diagnostics = outcome.error.iter().cloned().collect();
            let outcomes = vec![outcome, legacy.clone()];
            return ExecutionReport {
                mode: ctx.config.routing_mode(),
                plan: plan.clone(),
                provider: ProviderKind::Legacy,
                state: ExecutionState::from_outcomes(&outcomes),
                primary: legacy,
                outcomes,
                comparison: None,
                diagnostics,
                fallback_used: true,
            };
        }

        let outcomes = vec![outcome.clone()];
        ExecutionReport {
            mode: ctx.config.routing_mode(),
            plan: plan.clone(),
            provider: kind,
            state: ExecutionState::from_outcomes(&outcomes),
            primary: outcome,
            outcomes,
            comparison: None,
            diagnostics: Vec::new(),
            fallback_used: false,
        }
    }

    async fn execute_dual(&self, plan: &ExecutionPlan, ctx: &ExecutionContext<'_>) -> ExecutionReport {
        let (legacy, new) = tokio::join!(
            self.call_provider(ProviderKind::Legacy, ctx),
            self.call_provider(ProviderKind::New, ctx)
        );

        let comparison = match (&legacy.data, &new.data) {
            (Some(legacy_data), Some(new_data)) if ctx.config.config.features.comparison => {
                Some(self.compare_and_report(legacy_data, new_data, &legacy, &new, ctx))
            }
            _ => None,
        };

        let provider = plan.return_from.unwrap_or(if new.success {
            ProviderKind::New
        } else {
            ProviderKind::Legacy
        });

        let (primary, other) = match provider {
            ProviderKind::Legacy => (&legacy, &new),
            ProviderKind::New => (&new, &legacy),
        };
        let primary = primary.clone();
        let diagnostics = other.error.iter().cloned().collect();
        let outcomes = vec![legacy, new];

        ExecutionReport {
            mode: ctx.config.routing_mode(),
            plan: plan.clone(),
            provider,
            state: ExecutionState::from_outcomes(&outcomes),
            primary,
            outcomes,
            comparison,
            diagnostics,
            fallback_used: false,
        }
    }

    fn compare_and_report(
        &self,
        legacy_data: &ProviderResponse,
        new_data: &ProviderResponse,
        legacy: &Outcome,
        new: &Outcome,
        ctx: &ExecutionContext<'_>,
    ) -> ComparisonResult {
        let comparison = compare_responses(legacy_data, new_data);
        if !comparison.is_match() {
            warn!(
                request_id = %ctx.request_id,
                action = ctx.action.name(),
                status_match = comparison.status_match,
                external_id_match = comparison.external_id_match,
                data_match = comparison.data_match,
                differences = ?comparison.differences,
                "Provider results differ"
            );
        }
        self.sink.submit(ComparisonRecord {
            request_id: ctx.request_id,
            mode: ctx.config.routing_mode(),
            organization: ctx.config.organization.clone(),
            action: ctx.action.name().to_string(),
            comparison: comparison.clone(),
            legacy_duration_ms: legacy.duration_ms,
            new_duration_ms: new.duration_ms,
            recorded_at: self.clock.now(),
        });
        comparison
    }

    /// Run one provider to completion, capturing any failure in the outcome
    async fn call_provider(&self, kind: ProviderKind, ctx: &ExecutionContext<'_>) -> Outcome {
        let started = Instant::now();
        let adapter = self.registry.get(kind);
        let result = self.invoke(adapter.as_ref(), kind, ctx).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if let Err(e) = &result {
            debug!(request_id = %ctx.request_id, provider = %kind, error = %e, "Provider call failed");
        }
        Outcome::from_result(kind, result, duration_ms)
    }

    async fn invoke(
        &self,
        adapter: &dyn ProviderAdapter,
        kind: ProviderKind,
        ctx: &ExecutionContext<'_>,
    ) -> Result<ProviderResponse, ProviderError> {
        let body;
        let call = match ctx.action {
            DepositAction::Create { payload } => {
                body = adapter.transform_payload(payload)?;
                PreparedCall::Create(&body)
            }
            DepositAction::Status { external_id } => PreparedCall::Status(external_id),
        };

        let config = &ctx.config.config;
        let timeout = config.timeouts.for_provider(kind);
        with_retry(
            move || self.attempt(adapter, kind, call, ctx, timeout),
            config.retry.max_retries,
            config.retry.base_delay(),
        )
        .await
    }

    async fn attempt(
        &self,
        adapter: &dyn ProviderAdapter,
        kind: ProviderKind,
        call: PreparedCall<'_>,
        ctx: &ExecutionContext<'_>,
        timeout: Duration,
    ) -> Result<ProviderResponse, ProviderError> {
        let settings = &ctx.config.config.circuit_breaker;
        let breaker = self.breaker(kind);
        if !breaker.try_acquire(settings) {
            return Err(ProviderError::circuit_open(kind, call.operation()));
        }

        let request = async {
            match call {
                PreparedCall::Create(body) => adapter.create(body, ctx.credentials).await,
                PreparedCall::Status(external_id) => adapter.status(external_id, ctx.credentials).await,
            }
        };
        let result = match tokio::time::timeout(timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(
                kind,
                call.operation(),
                u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        };

        match &result {
            Err(e) if e.is_retryable() => breaker.record_failure(settings),
            _ => breaker.record_success(),
        }
        result
    }

    /// Probe every adapter and report breaker states
    pub async fn provider_health(&self) -> Vec<ProviderStatusReport> {
        let (legacy, new) = tokio::join!(
            self.registry.get(ProviderKind::Legacy).health_check(),
            self.registry.get(ProviderKind::New).health_check()
        );
        [legacy, new]
            .into_iter()
            .map(|health| ProviderStatusReport {
                provider: health.provider,
                circuit: self.breaker(health.provider).state(),
                health,
            })
            .collect()
    }
}

impl std::fmt::Debug for DualExecutionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DualExecutionCoordinator")
            .field("registry", &self.registry)
            .field("legacy_breaker", &self.legacy_breaker)
            .field("new_breaker", &self.new_breaker)
            .finish_non_exhaustive()
    }
}
