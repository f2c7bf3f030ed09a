//! Client configuration resolution from multiple sources
//!
//! Sources are checked in priority order and each field takes the value
//! from the first source that sets it. Default order:
//! 1. Environment variables (`CATALYST_*`)
//! 2. Workspace config (.config/globalcred/config.yaml), when a workspace is set
//! 3. User config (~/.config/globalcred/config.yaml)

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{
    ClientConfig, ConfigProvider, ConfigResult, EnvConfigProvider, FileConfigProvider,
    PartialConfig,
};
use crate::logging::file_logger as log;

/// Resolved configuration with source tracking
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: ClientConfig,
    /// Field name → name of the provider that supplied it
    pub sources: BTreeMap<&'static str, String>,
}

impl ResolvedConfig {
    pub fn source_of(&self, field: &str) -> Option<&str> {
        self.sources.get(field).map(|s| s.as_str())
    }
}

/// Priority-ordered configuration resolver
#[derive(Clone)]
pub struct ConfigResolver {
    providers: Vec<Arc<dyn ConfigProvider>>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn fill<T: Clone>(
    slot: &mut Option<T>,
    value: &Option<T>,
    field: &'static str,
    source: &str,
    sources: &mut BTreeMap<&'static str, String>,
) {
    if slot.is_none() {
        if let Some(v) = value {
            *slot = Some(v.clone());
            sources.insert(field, source.to_string());
        }
    }
}

impl ConfigResolver {
    /// Environment, then user config
    pub fn new() -> Self {
        Self {
            providers: vec![
                Arc::new(EnvConfigProvider::new()),
                Arc::new(FileConfigProvider::user()),
            ],
        }
    }

    /// Environment, then workspace config, then user config
    pub fn with_workspace(workspace_path: impl Into<PathBuf>) -> Self {
        Self {
            providers: vec![
                Arc::new(EnvConfigProvider::new()),
                Arc::new(FileConfigProvider::workspace(workspace_path.into())),
                Arc::new(FileConfigProvider::user()),
            ],
        }
    }

    /// Explicit provider list, highest priority first
    pub fn with_providers(providers: Vec<Arc<dyn ConfigProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Merge all providers without validating
    pub fn merge(&self) -> ConfigResult<(PartialConfig, BTreeMap<&'static str, String>)> {
        let mut merged = PartialConfig::default();
        let mut sources = BTreeMap::new();

        for provider in &self.providers {
            let name = provider.name();
            let partial = provider.load()?;
            log::debug("resolver::config", &format!("Loaded {:?} from {}", partial, name));

            fill(&mut merged.base_url, &partial.base_url, "base_url", name, &mut sources);
            fill(&mut merged.username, &partial.username, "username", name, &mut sources);
            fill(&mut merged.password, &partial.password, "password", name, &mut sources);
            fill(&mut merged.auth_token, &partial.auth_token, "auth_token", name, &mut sources);
            fill(&mut merged.verify_tls, &partial.verify_tls, "verify_tls", name, &mut sources);
            fill(&mut merged.timeout_secs, &partial.timeout_secs, "timeout_secs", name, &mut sources);
            fill(&mut merged.debug, &partial.debug, "debug", name, &mut sources);
        }

        Ok((merged, sources))
    }

    /// Merge and validate into a client config
    pub fn resolve(&self) -> ConfigResult<ResolvedConfig> {
        let (merged, sources) = self.merge()?;
        let config = ClientConfig::from_partial(&merged)?;
        Ok(ResolvedConfig { config, sources })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, ConfigError, ConfigLevel, MemoryConfigProvider};
    use std::time::Duration;
    use tempfile::tempdir;

    fn memory(name: &str, config: PartialConfig) -> Arc<dyn ConfigProvider> {
        Arc::new(MemoryConfigProvider::with_config(config).named(name))
    }

    #[test]
    fn test_first_provider_wins_per_field() {
        let resolver = ConfigResolver::with_providers(vec![
            memory("high", PartialConfig::new().with_base_url("https://high")),
            memory(
                "low",
                PartialConfig::new()
                    .with_base_url("https://low")
                    .with_login("admin", "secret")
                    .with_timeout_secs(5),
            ),
        ]);

        let resolved = resolver.resolve().unwrap();
        assert_eq!(resolved.config.base_url, "https://high");
        assert_eq!(resolved.config.timeout, Duration::from_secs(5));
        assert_eq!(resolved.source_of("base_url"), Some("high"));
        assert_eq!(resolved.source_of("username"), Some("low"));
        assert_eq!(resolved.source_of("auth_token"), None);
        assert_eq!(resolver.provider_names(), vec!["high", "low"]);
    }

    #[test]
    fn test_resolve_reports_missing_settings() {
        let resolver = ConfigResolver::with_providers(vec![memory(
            "only",
            PartialConfig::new().with_base_url("https://dnac"),
        )]);
        assert!(matches!(resolver.resolve(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_file_below_memory() {
        let dir = tempdir().unwrap();
        let file = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);
        file.save(
            &PartialConfig::new()
                .with_base_url("https://from-file")
                .with_auth_token("file-token")
                .with_verify_tls(false),
        )
        .unwrap();

        let resolver = ConfigResolver::with_providers(vec![
            memory("override", PartialConfig::new().with_auth_token("mem-token")),
            Arc::new(file),
        ]);

        let resolved = resolver.resolve().unwrap();
        assert_eq!(resolved.config.base_url, "https://from-file");
        assert_eq!(resolved.config.auth, AuthConfig::Token("mem-token".to_string()));
        assert!(!resolved.config.verify_tls);
        assert_eq!(resolved.source_of("verify_tls"), Some("file:user"));
    }
}
