use crate::config::RateLimitRule;
use async_trait::async_trait;
use dashmap::DashMap;
use dsw_domain::error::Result;
use dsw_domain::ports::RateLimitConfigStore;
use dsw_domain::value_objects::{RateLimitConfig, RateLimitKey};

/// Rate-limit rows keyed by (integration, organization)
#[derive(Debug, Default)]
pub struct InMemoryRateLimitConfigStore {
    rows: DashMap<RateLimitKey, RateLimitConfig>,
}

impl InMemoryRateLimitConfigStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded from configured rules; later rules win on duplicate keys
    pub fn from_rules(rules: &[RateLimitRule]) -> Self {
        let store = Self::new();
        for rule in rules {
            store.rows.insert(rule.key(), rule.to_config());
        }
        store
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are stored
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl RateLimitConfigStore for InMemoryRateLimitConfigStore {
    async fn get(&self, key: &RateLimitKey) -> Result<Option<RateLimitConfig>> {
        Ok(self.rows.get(key).map(|row| row.value().clone()))
    }

    async fn put(&self, key: &RateLimitKey, config: RateLimitConfig) -> Result<()> {
        self.rows.insert(key.clone(), config);
        Ok(())
    }

    async fn delete(&self, key: &RateLimitKey) -> Result<bool> {
        Ok(self.rows.remove(key).is_some())
    }
}
