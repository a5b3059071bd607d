//! Persistence ports
//!
//! The core only needs get/put/delete semantics; storage engines are out of
//! scope and plugged in behind these traits.

use crate::error::Result;
use crate::value_objects::{RateLimitConfig, RateLimitKey, RoutingSettings, SettingsUpdate};
use async_trait::async_trait;

/// Source of truth for global routing settings
#[async_trait]
pub trait RoutingSettingsSource: Send + Sync {
    /// Read the current raw settings
    async fn load(&self) -> Result<RoutingSettings>;

    /// Persist a single validated update
    async fn apply(&self, update: &SettingsUpdate) -> Result<()>;
}

/// Durable rate-limit configuration store
///
/// Keys are `(integration, organization)` with `_default` as the
/// integration-wide organization.
#[async_trait]
pub trait RateLimitConfigStore: Send + Sync {
    /// Read the configuration stored under `key`
    async fn get(&self, key: &RateLimitKey) -> Result<Option<RateLimitConfig>>;

    /// Insert or replace the configuration under `key`
    async fn put(&self, key: &RateLimitKey, config: RateLimitConfig) -> Result<()>;

    /// Remove the configuration under `key`, returning whether it existed
    async fn delete(&self, key: &RateLimitKey) -> Result<bool>;
}
