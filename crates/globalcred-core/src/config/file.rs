//! File-based configuration provider (YAML)
//!
//! Supports user-level (~/.config/globalcred/config.yaml) and
//! workspace-level (.config/globalcred/config.yaml) config.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::traits::{ConfigProvider, ConfigResult, PartialConfig};

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/globalcred/config.yaml)
    User,
    /// Workspace-level config (.config/globalcred/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// File-based configuration provider
///
/// A missing file is not an error, it just contributes nothing.
///
/// # Example
///
/// ```no_run
/// use globalcred_core::config::FileConfigProvider;
///
/// let user_config = FileConfigProvider::user();
/// let workspace_config = FileConfigProvider::workspace("/path/to/workspace");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    name: String,
    cache: RwLock<Option<PartialConfig>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            name: format!("file:{}", level.as_str()),
            cache: RwLock::new(None),
        }
    }

    /// User-level config provider (~/.config/globalcred/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(config_dir.join("globalcred").join("config.yaml"), ConfigLevel::User)
    }

    /// Workspace-level config provider (.config/globalcred/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root
            .as_ref()
            .join(".config")
            .join("globalcred")
            .join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> ConfigResult<PartialConfig> {
        if !self.path.exists() {
            return Ok(PartialConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(PartialConfig::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Write settings to the file, creating parent directories
    pub fn save(&self, config: &PartialConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_yaml::to_string(config)?)?;
        *self.cache.write() = Some(config.clone());
        Ok(())
    }

    /// Re-read the file, dropping the cached copy
    pub fn reload(&self) -> ConfigResult<PartialConfig> {
        let config = self.read()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> ConfigResult<PartialConfig> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("config.yaml"), ConfigLevel::User);

        assert!(!provider.exists());
        assert!(provider.load().unwrap().is_empty());
        assert_eq!(provider.name(), "file:user");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let provider = FileConfigProvider::new(&path, ConfigLevel::User);

        let partial = PartialConfig::new()
            .with_base_url("https://dnac.example.com")
            .with_login("admin", "secret")
            .with_verify_tls(false);
        provider.save(&partial).unwrap();

        assert!(provider.exists());
        assert_eq!(provider.reload().unwrap(), partial);

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("base_url"));
        assert!(content.contains("verify_tls: false"));
    }

    #[test]
    fn test_load_handwritten_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "base_url: https://10.0.0.1\nauth_token: abc\ntimeout_secs: 30\n",
        )
        .unwrap();

        let loaded = FileConfigProvider::new(&path, ConfigLevel::Workspace).load().unwrap();
        assert_eq!(loaded.base_url.as_deref(), Some("https://10.0.0.1"));
        assert_eq!(loaded.auth_token.as_deref(), Some("abc"));
        assert_eq!(loaded.timeout_secs, Some(30));
        assert_eq!(loaded.username, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "base_uri: https://typo\n").unwrap();

        let result = FileConfigProvider::new(&path, ConfigLevel::User).load();
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_workspace_path() {
        let provider = FileConfigProvider::workspace("/ws");
        assert_eq!(provider.level(), ConfigLevel::Workspace);
        assert!(provider.path().ends_with(".config/globalcred/config.yaml"));
        assert_eq!(provider.name(), "file:workspace");
    }
}
