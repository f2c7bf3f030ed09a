//! In-memory configuration provider

use parking_lot::RwLock;

use super::traits::{ConfigProvider, ConfigResult, PartialConfig};

/// In-memory configuration provider for testing and embedding
#[derive(Debug)]
pub struct MemoryConfigProvider {
    name: String,
    config: RwLock<PartialConfig>,
}

impl Default for MemoryConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::with_config(PartialConfig::default())
    }

    pub fn with_config(config: PartialConfig) -> Self {
        Self {
            name: "memory".to_string(),
            config: RwLock::new(config),
        }
    }

    /// Rename the provider (shows up as the source of resolved fields)
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn set_config(&self, config: PartialConfig) {
        *self.config.write() = config;
    }

    pub fn clear(&self) {
        *self.config.write() = PartialConfig::default();
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ConfigResult<PartialConfig> {
        Ok(self.config.read().clone())
    }
}
