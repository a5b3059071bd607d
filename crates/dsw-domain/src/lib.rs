//! Domain Layer - Deposit Switch
//!
//! Core types shared by every layer of the deposit routing engine:
//!
//! - [`value_objects`]: routing modes, execution plans, rate-limit records,
//!   deposit payloads and execution outcomes
//! - [`ports`]: traits the application layer depends on (provider adapters,
//!   configuration sources, clocks, telemetry sinks)
//! - [`error`]: the shared [`Error`] type and [`Result`] alias
//! - [`constants`]: defaults for TTLs, windows and limits
//!
//! This crate has no runtime dependencies beyond serialization and error
//! derivation so it can be consumed by adapters and infrastructure alike.

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, ProviderError, ProviderErrorKind, ProviderOperation, Result};
pub use value_objects::*;
