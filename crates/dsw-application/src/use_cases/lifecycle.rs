//! Per-request state machine
//!
//! `Init -> Routed -> {ExecutingSingle | ExecutingDual} ->
//! {Succeeded | Failed | Partial} -> Responded`. Not persisted.

use dsw_domain::error::{Error, Result};
use dsw_domain::value_objects::ExecutionState;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use uuid::Uuid;

/// Phase of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPhase {
    /// Admitted, nothing decided yet
    Init,
    /// Execution plan chosen
    Routed,
    /// One adapter running
    ExecutingSingle,
    /// Both adapters running
    ExecutingDual,
    /// Every executed adapter succeeded
    Succeeded,
    /// No executed adapter succeeded
    Failed,
    /// Some adapters succeeded
    Partial,
    /// Result handed back to the caller
    Responded,
}

impl RequestPhase {
    /// Whether `next` may follow `self`
    pub fn can_transition_to(self, next: RequestPhase) -> bool {
        use RequestPhase as P;
        matches!(
            (self, next),
            (P::Init, P::Routed)
                | (P::Routed, P::ExecutingSingle | P::ExecutingDual)
                | (
                    P::ExecutingSingle | P::ExecutingDual,
                    P::Succeeded | P::Failed | P::Partial
                )
                | (P::Succeeded | P::Failed | P::Partial, P::Responded)
        )
    }
}

impl From<ExecutionState> for RequestPhase {
    fn from(state: ExecutionState) -> Self {
        match state {
            ExecutionState::Succeeded => Self::Succeeded,
            ExecutionState::Failed => Self::Failed,
            ExecutionState::Partial => Self::Partial,
        }
    }
}

impl fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Routed => "routed",
            Self::ExecutingSingle => "executing_single",
            Self::ExecutingDual => "executing_dual",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Partial => "partial",
            Self::Responded => "responded",
        };
        f.write_str(name)
    }
}

/// Tracks the phases one request went through
#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    request_id: Uuid,
    phase: RequestPhase,
    history: Vec<RequestPhase>,
}

impl RequestLifecycle {
    /// Start a lifecycle in [`RequestPhase::Init`]
    pub fn new(request_id: Uuid) -> Self {
        Self {
            request_id,
            phase: RequestPhase::Init,
            history: vec![RequestPhase::Init],
        }
    }

    /// Request identifier
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Current phase
    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    /// Every phase visited, in order
    pub fn history(&self) -> &[RequestPhase] {
        &self.history
    }

    /// Move to `next`; illegal transitions are internal errors
    pub fn advance(&mut self, next: RequestPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(Error::internal(format!(
                "illegal request transition {} -> {} for {}",
                self.phase, next, self.request_id
            )));
        }
        trace!(request_id = %self.request_id, from = %self.phase, to = %next, "Request phase");
        self.phase = next;
        self.history.push(next);
        Ok(())
    }
}
