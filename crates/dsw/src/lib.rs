//! # Deposit Switch
//!
//! Migrates deposit-registration traffic from the legacy deposit API to the
//! Salesforce one without changing what integrations see.
//!
//! This crate is the public facade: it re-exports the layer crates and
//! hosts the `dsw` command line.
//!
//! ## Features
//!
//! - **Configurable routing**: legacy-only, salesforce-only, both, shadow and
//!   percentage forwarding, with per-organization preferences
//! - **Dual execution**: both backends called concurrently, results compared
//!   and recorded off the request path
//! - **Rate limiting**: per integration and organization minute/hour buckets
//! - **Resilience**: per-provider timeouts, retry with backoff, circuit
//!   breakers and fallback to legacy
//!
//! ## Example
//!
//! ```ignore
//! use dsw::infrastructure::{AppConfig, init_app};
//! use dsw::domain::value_objects::{OrganizationKey, ProviderPreference};
//!
//! let context = init_app(AppConfig::default())?;
//! let (_, plan) = context
//!     .gateway
//!     .plan(&OrganizationKey::new("AG1", "BR1"), ProviderPreference::Auto)
//!     .await?;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Value objects, ports and errors
//! - `application` - Configuration store, rate limiter, routing engine,
//!   dual execution coordinator and gateway
//! - `infrastructure` - Config, logging, in-memory stores, telemetry, wiring
//! - `providers` - Legacy and Salesforce HTTP adapters

/// Domain layer - value objects, ports and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use dsw_domain::*;
}

/// Application layer - use cases
///
/// Re-exports from the application crate for convenience
pub mod application {
    pub use dsw_application::*;
}

/// Infrastructure layer - config, logging and composition root
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use dsw_infrastructure::*;
}

/// Provider adapters
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use dsw_providers::*;
}

pub mod cli;

pub use application::use_cases::{DepositGateway, GatewayRequest, GatewayResponse};
pub use infrastructure::{AppConfig, AppContext, ConfigLoader, init_app};
