//! Configuration provider abstractions
//!
//! Supports multiple configuration sources:
//! - `EnvConfigProvider`: `CATALYST_*` environment variables
//! - `FileConfigProvider`: YAML file-based (user/workspace level)
//! - `MemoryConfigProvider`: In-memory for testing
//!
//! `resolver::ConfigResolver` merges them into a validated `ClientConfig`.

mod traits;
mod env;
mod file;
mod memory;

pub use traits::{AuthConfig, ClientConfig, ConfigError, ConfigProvider, ConfigResult, PartialConfig};
pub use env::{
    EnvConfigProvider, ENV_AUTH_TOKEN, ENV_BASE_URL, ENV_DEBUG, ENV_PASSWORD, ENV_SSL_VERIFY,
    ENV_TIMEOUT, ENV_USERNAME,
};
pub use file::{ConfigLevel, FileConfigProvider};
pub use memory::MemoryConfigProvider;
