//! Environment variable configuration provider

use std::collections::HashMap;
use std::env;

use super::traits::{ConfigError, ConfigProvider, ConfigResult, PartialConfig};

pub const ENV_BASE_URL: &str = "CATALYST_BASE_URL";
pub const ENV_USERNAME: &str = "CATALYST_USERNAME";
pub const ENV_PASSWORD: &str = "CATALYST_PASSWORD";
pub const ENV_AUTH_TOKEN: &str = "CATALYST_AUTH_TOKEN";
pub const ENV_SSL_VERIFY: &str = "CATALYST_SSL_VERIFY";
pub const ENV_TIMEOUT: &str = "CATALYST_TIMEOUT";
pub const ENV_DEBUG: &str = "CATALYST_DEBUG";

/// Reads `CATALYST_*` environment variables
///
/// Empty variables count as unset. Booleans accept `true/false`, `1/0`,
/// `yes/no` in any case.
#[derive(Debug, Default)]
pub struct EnvConfigProvider {
    /// Fixed variables instead of the process environment
    overrides: Option<HashMap<String, String>>,
}

impl EnvConfigProvider {
    /// Provider over the process environment
    pub fn new() -> Self {
        Self { overrides: None }
    }

    /// Provider over a fixed set of variables
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self {
            overrides: Some(vars),
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        let value = match &self.overrides {
            Some(vars) => vars.get(key).cloned(),
            None => env::var(key).ok(),
        };
        value.filter(|v| !v.is_empty())
    }

    fn bool_var(&self, key: &str) -> ConfigResult<Option<bool>> {
        self.var(key)
            .map(|raw| match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ConfigError::invalid_value(key, format!("not a boolean: {}", raw))),
            })
            .transpose()
    }

    fn u64_var(&self, key: &str) -> ConfigResult<Option<u64>> {
        self.var(key)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::invalid_value(key, format!("not a number: {}", raw)))
            })
            .transpose()
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn load(&self) -> ConfigResult<PartialConfig> {
        Ok(PartialConfig {
            base_url: self.var(ENV_BASE_URL),
            username: self.var(ENV_USERNAME),
            password: self.var(ENV_PASSWORD),
            auth_token: self.var(ENV_AUTH_TOKEN),
            verify_tls: self.bool_var(ENV_SSL_VERIFY)?,
            timeout_secs: self.u64_var(ENV_TIMEOUT)?,
            debug: self.bool_var(ENV_DEBUG)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(vars: &[(&str, &str)]) -> EnvConfigProvider {
        EnvConfigProvider::from_map(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_reads_all_variables() {
        let loaded = provider(&[
            (ENV_BASE_URL, "https://dnac"),
            (ENV_USERNAME, "admin"),
            (ENV_PASSWORD, "secret"),
            (ENV_SSL_VERIFY, "False"),
            (ENV_TIMEOUT, "15"),
            (ENV_DEBUG, "yes"),
        ])
        .load()
        .unwrap();

        assert_eq!(loaded.base_url.as_deref(), Some("https://dnac"));
        assert_eq!(loaded.username.as_deref(), Some("admin"));
        assert_eq!(loaded.password.as_deref(), Some("secret"));
        assert_eq!(loaded.auth_token, None);
        assert_eq!(loaded.verify_tls, Some(false));
        assert_eq!(loaded.timeout_secs, Some(15));
        assert_eq!(loaded.debug, Some(true));
    }

    #[test]
    fn test_empty_variables_are_unset() {
        let loaded = provider(&[(ENV_BASE_URL, ""), (ENV_SSL_VERIFY, "")]).load().unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            provider(&[(ENV_SSL_VERIFY, "maybe")]).load(),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            provider(&[(ENV_TIMEOUT, "soon")]).load(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
