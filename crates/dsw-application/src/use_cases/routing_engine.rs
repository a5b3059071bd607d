//! Routing Decision Use Case
//!
//! Maps an effective configuration to the adapters to invoke and the
//! provider whose result is surfaced.
//!
//! | mode            | execute      | target | return_from |
//! |-----------------|--------------|--------|-------------|
//! | legacy-only     | legacy       | legacy | -           |
//! | salesforce-only | new          | new    | -           |
//! | both            | legacy, new  | both   | -           |
//! | shadow          | legacy, new  | legacy | legacy      |
//! | forwarding      | draw         | draw   | -           |

use dsw_domain::ports::RandomSource;
use dsw_domain::value_objects::{EffectiveConfig, ExecutionPlan, ProviderKind, RoutingMode};
use std::sync::Arc;
use tracing::{debug, warn};

/// Stateless routing decision engine
#[derive(Clone)]
pub struct RoutingDecisionEngine {
    random: Arc<dyn RandomSource>,
}

impl RoutingDecisionEngine {
    /// Create an engine drawing forwarding decisions from `random`
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }

    /// Execution plan for an effective configuration
    pub fn determine_provider(&self, effective: &EffectiveConfig) -> ExecutionPlan {
        let mode = effective.routing_mode();
        let plan = self.plan_for_mode(mode, effective.config.forwarding_percentage);
        debug!(
            mode = %mode,
            target = ?plan.target,
            organization = ?effective.organization,
            "Routing decision made"
        );
        plan
    }

    /// Execution plan for a raw mode label
    ///
    /// Unknown labels route to the legacy backend with a warning instead of
    /// failing; the new backend is never the fallback.
    pub fn determine_provider_for_label(&self, label: &str, forwarding_percentage: f64) -> ExecutionPlan {
        match label.parse::<RoutingMode>() {
            Ok(mode) => self.plan_for_mode(mode, forwarding_percentage),
            Err(_) => {
                warn!(mode = label, "Unknown routing mode, routing to legacy");
                ExecutionPlan::single(ProviderKind::Legacy)
            }
        }
    }

    fn plan_for_mode(&self, mode: RoutingMode, forwarding_percentage: f64) -> ExecutionPlan {
        match mode {
            RoutingMode::LegacyOnly => ExecutionPlan::single(ProviderKind::Legacy),
            RoutingMode::SalesforceOnly => ExecutionPlan::single(ProviderKind::New),
            RoutingMode::Both => ExecutionPlan::dual(None),
            RoutingMode::Shadow => ExecutionPlan::dual(Some(ProviderKind::Legacy)),
            RoutingMode::Forwarding => ExecutionPlan::single(self.draw(forwarding_percentage)),
        }
    }

    /// Forwarding draw; the extremes never consult the random source
    pub fn draw(&self, forwarding_percentage: f64) -> ProviderKind {
        if forwarding_percentage <= 0.0 {
            ProviderKind::Legacy
        } else if forwarding_percentage >= 100.0 {
            ProviderKind::New
        } else if self.random.next_percent() < forwarding_percentage {
            ProviderKind::New
        } else {
            ProviderKind::Legacy
        }
    }
}

impl std::fmt::Debug for RoutingDecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingDecisionEngine").finish_non_exhaustive()
    }
}
