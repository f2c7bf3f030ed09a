//! Configuration provider trait and shared types

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration provider abstraction
///
/// Implementations:
/// - `EnvConfigProvider`: `CATALYST_*` environment variables
/// - `FileConfigProvider`: YAML file (user or workspace level)
/// - `MemoryConfigProvider`: In-memory for testing
///
/// Providers return partial settings; `ConfigResolver` merges them.
pub trait ConfigProvider: Send + Sync {
    /// Human-readable name, recorded as the source of each resolved field
    fn name(&self) -> &str;

    /// Load whatever settings this source has
    fn load(&self) -> ConfigResult<PartialConfig>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Other(String),
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings as read from a single source; every field optional
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_tls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
}

impl PartialConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_login(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = Some(verify);
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn mask(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "**REDACTED**")
}

impl fmt::Debug for PartialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &mask(&self.password))
            .field("auth_token", &mask(&self.auth_token))
            .field("verify_tls", &self.verify_tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("debug", &self.debug)
            .finish()
    }
}

/// How the HTTP transport authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum AuthConfig {
    /// Pre-issued `X-Auth-Token`
    Token(String),
    /// Exchange basic credentials for a token on first use
    Login { username: String, password: String },
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::Token(_) => f.write_str("Token(**REDACTED**)"),
            AuthConfig::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"**REDACTED**")
                .finish(),
        }
    }
}

/// Validated client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Controller base URL, without trailing slash
    pub base_url: String,
    pub auth: AuthConfig,
    pub verify_tls: bool,
    pub timeout: Duration,
    pub debug: bool,
}

impl ClientConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    pub fn new(base_url: impl Into<String>, auth: AuthConfig) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            verify_tls: true,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            debug: false,
        }
    }

    /// Validate merged settings into a usable config
    ///
    /// A token takes precedence over a username/password pair.
    pub fn from_partial(partial: &PartialConfig) -> ConfigResult<Self> {
        let base_url = partial
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ConfigError::Missing("base_url".to_string()))?;

        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigError::invalid_value(
                "base_url",
                "must start with http:// or https://",
            ));
        }

        let auth = match (&partial.auth_token, &partial.username, &partial.password) {
            (Some(token), _, _) if !token.is_empty() => AuthConfig::Token(token.clone()),
            (_, Some(username), Some(password)) if !username.is_empty() => AuthConfig::Login {
                username: username.clone(),
                password: password.clone(),
            },
            _ => {
                return Err(ConfigError::Missing(
                    "auth_token or username/password".to_string(),
                ))
            }
        };

        let timeout_secs = partial.timeout_secs.unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::invalid_value("timeout_secs", "must be positive"));
        }

        let mut config = Self::new(base_url, auth);
        config.verify_tls = partial.verify_tls.unwrap_or(true);
        config.timeout = Duration::from_secs(timeout_secs);
        config.debug = partial.debug.unwrap_or(false);
        Ok(config)
    }
}
