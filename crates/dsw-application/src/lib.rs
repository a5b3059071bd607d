//! Application Layer - Deposit Switch
//!
//! Use cases of the deposit routing engine, wired together by
//! [`use_cases::DepositGateway`]:
//!
//! | Use case | Responsibility |
//! |----------|----------------|
//! | [`use_cases::RateLimiter`] | Sliding-window admission per (integration, organization) |
//! | [`use_cases::ConfigurationStore`] | Cached, validated global and organization routing config |
//! | [`use_cases::RoutingDecisionEngine`] | Effective config to execution plan |
//! | [`use_cases::DualExecutionCoordinator`] | Isolated single/dual provider execution and comparison |
//!
//! ## Ports
//!
//! - [`ports::registry`]: provider adapter registry populated by `dsw-providers`
//!
//! ## Dependencies
//!
//! This crate depends only on `dsw-domain` and runtime libraries; concrete
//! stores, clocks and adapters are injected.

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
