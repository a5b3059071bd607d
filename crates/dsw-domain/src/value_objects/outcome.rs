//! Execution outcomes and comparison results

use crate::error::{Error, ProviderError, Result};
use crate::value_objects::routing::{ExecutionPlan, ProviderKind, RoutingMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized response from a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// HTTP status returned by the backend
    pub status_code: u16,
    /// Identifier the backend assigned to the deposit
    pub external_id: Option<String>,
    /// Response body in the shared normalized shape
    pub body: Value,
}

/// Result of one adapter call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Provider that produced the outcome
    pub provider: ProviderKind,
    /// Whether the call succeeded
    pub success: bool,
    /// Response, present on success
    pub data: Option<ProviderResponse>,
    /// Failure, present when `success` is false
    pub error: Option<ProviderError>,
    /// Wall time of the call including retries
    pub duration_ms: u64,
}

impl Outcome {
    /// Build an outcome from an adapter result
    pub fn from_result(
        provider: ProviderKind,
        result: std::result::Result<ProviderResponse, ProviderError>,
        duration_ms: u64,
    ) -> Self {
        match result {
            Ok(data) => Self {
                provider,
                success: true,
                data: Some(data),
                error: None,
                duration_ms,
            },
            Err(error) => Self {
                provider,
                success: false,
                data: None,
                error: Some(error),
                duration_ms,
            },
        }
    }
}

/// Comparison of two successful outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Status codes are equivalent
    pub status_match: bool,
    /// External identifiers are equal
    pub external_id_match: bool,
    /// Normalized bodies are structurally equal
    pub data_match: bool,
    /// JSON paths that differed between the bodies
    #[serde(default)]
    pub differences: Vec<String>,
}

impl ComparisonResult {
    /// Every compared aspect matched
    pub fn is_match(&self) -> bool {
        self.status_match && self.external_id_match && self.data_match
    }
}

/// Terminal state of an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    /// Every executed provider succeeded
    Succeeded,
    /// No executed provider succeeded
    Failed,
    /// Some providers succeeded and some failed
    Partial,
}

impl ExecutionState {
    /// Derive the state from the collected outcomes
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        if succeeded == outcomes.len() && succeeded > 0 {
            Self::Succeeded
        } else if succeeded == 0 {
            Self::Failed
        } else {
            Self::Partial
        }
    }
}

/// Structured result of executing a plan
///
/// Always produced, whether or not the providers succeeded; failures of
/// providers that were not surfaced are kept in `diagnostics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// Mode the plan was derived from
    pub mode: RoutingMode,
    /// Plan that was executed
    pub plan: ExecutionPlan,
    /// Provider whose outcome was surfaced
    pub provider: ProviderKind,
    /// Surfaced outcome
    pub primary: Outcome,
    /// Every outcome collected, in execution order
    pub outcomes: Vec<Outcome>,
    /// Comparison, when both providers ran and succeeded
    pub comparison: Option<ComparisonResult>,
    /// Failures of providers that were not surfaced
    pub diagnostics: Vec<ProviderError>,
    /// Terminal state
    pub state: ExecutionState,
    /// The legacy provider was run because the planned provider failed
    pub fallback_used: bool,
}

impl ExecutionReport {
    /// Outcome produced by a given provider
    pub fn outcome_for(&self, provider: ProviderKind) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.provider == provider)
    }

    /// Surfaced response, or the surfaced provider's error
    pub fn into_result(self) -> Result<ProviderResponse> {
        match (self.primary.data, self.primary.error) {
            (Some(data), _) => Ok(data),
            (None, Some(error)) => Err(Error::Provider(error)),
            (None, None) => Err(Error::internal(format!(
                "outcome for {} carried neither data nor error",
                self.primary.provider
            ))),
        }
    }
}
