//! # Infrastructure Layer
//!
//! Cross-cutting technical concerns that support the application and domain
//! layers.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration (defaults, `dsw.toml`, `DSW__` env) |
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context extension for foreign errors |
//! | [`clock`] | System clock and random source |
//! | [`stores`] | In-memory routing settings, rate-limit and comparison stores |
//! | [`telemetry`] | Background comparison dispatcher |
//! | [`bootstrap`] | Composition root |
//! | [`constants`] | Infrastructure constants |

// Force-link dsw-providers so its linkme adapter registrations are included
extern crate dsw_providers;

pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod stores;
pub mod telemetry;

pub use bootstrap::{AppContext, init_app};
pub use config::{AppConfig, ConfigLoader};
pub use error_ext::ErrorContext;
