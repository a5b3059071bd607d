//! # Deposit Switch - Provider Implementations
//!
//! Concrete [`ProviderAdapter`] implementations for the two deposit
//! backends traffic is migrated between.
//!
//! | Adapter | Registry name | Backend |
//! |---------|---------------|---------|
//! | [`deposit::LegacyDepositAdapter`] | `legacy-http` | Current production API |
//! | [`deposit::SalesforceDepositAdapter`] | `salesforce-http` | Salesforce API |
//!
//! Each adapter submits itself to
//! [`dsw_application::ports::PROVIDER_ADAPTERS`]; binaries must link this
//! crate (`extern crate dsw_providers;`) for the entries to be collected.

pub use dsw_domain::error::{Error, ProviderError, Result};
pub use dsw_domain::ports::ProviderAdapter;

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Deposit backend adapters
pub mod deposit;

pub use deposit::{LegacyDepositAdapter, SalesforceDepositAdapter};
