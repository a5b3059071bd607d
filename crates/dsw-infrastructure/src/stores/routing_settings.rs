use async_trait::async_trait;
use dsw_domain::error::Result;
use dsw_domain::ports::RoutingSettingsSource;
use dsw_domain::value_objects::{RoutingSettings, SettingsUpdate};
use tokio::sync::RwLock;
use tracing::debug;

/// Routing settings held in memory, seeded from configuration
#[derive(Debug, Default)]
pub struct InMemoryRoutingSettingsSource {
    settings: RwLock<RoutingSettings>,
}

impl InMemoryRoutingSettingsSource {
    /// Create a source holding `settings`
    pub fn new(settings: RoutingSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Replace every setting at once
    pub async fn replace(&self, settings: RoutingSettings) {
        *self.settings.write().await = settings;
    }
}

#[async_trait]
impl RoutingSettingsSource for InMemoryRoutingSettingsSource {
    async fn load(&self) -> Result<RoutingSettings> {
        Ok(self.settings.read().await.clone())
    }

    async fn apply(&self, update: &SettingsUpdate) -> Result<()> {
        self.settings.write().await.apply(update);
        debug!(update = ?update, "Routing settings updated");
        Ok(())
    }
}
