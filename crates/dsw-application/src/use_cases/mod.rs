//! Use cases
//!
//! Request flow: [`RateLimiter::admit`] ->
//! [`ConfigurationStore::organization_config`] ->
//! [`RoutingDecisionEngine::determine_provider`] ->
//! [`DualExecutionCoordinator::execute`], orchestrated by [`DepositGateway`].

pub mod circuit_breaker;
pub mod comparison;
pub mod configuration_store;
pub mod dual_execution;
pub mod gateway;
pub mod lifecycle;
pub mod rate_limiter;
pub mod retry;
pub mod routing_engine;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use comparison::{compare_responses, structural_diff};
pub use configuration_store::ConfigurationStore;
pub use dual_execution::{DualExecutionCoordinator, ExecutionContext, ProviderStatusReport};
pub use gateway::{DepositGateway, GatewayRequest, GatewayResponse};
pub use lifecycle::{RequestLifecycle, RequestPhase};
pub use rate_limiter::{BucketUsage, RateLimiter};
pub use retry::{Retryable, backoff_delay, with_retry};
pub use routing_engine::RoutingDecisionEngine;
