//! Global Credential Core
//!
//! Read-only lookup of Catalyst Center global credentials (CLI, SNMP, HTTP,
//! NETCONF). The crate decides which backend operation a set of filters
//! calls for, runs it, and projects each credential onto the fields its
//! type actually uses.
//!
//! ## Reading credentials
//!
//! ```rust,ignore
//! use globalcred_core::{ConfigResolver, GlobalCredentialDataSource, MapInput, MemoryState};
//!
//! let resolved = ConfigResolver::new().resolve()?;
//! let source = GlobalCredentialDataSource::from_config(&resolved.config)?;
//!
//! // List filters win over `id` when both are given
//! let input = MapInput::new().with("credential_sub_type", "CLI");
//! let state = MemoryState::new();
//! source.read(&input, &state).await?;
//!
//! // Secrets stay intact in state, masked for display
//! println!("{:?}", state.get_masked("items"));
//! ```

pub mod types;
pub mod schema;
pub mod state;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod backend;
pub mod config;
pub mod logging;
pub mod datasource;

// Re-export commonly used types
pub use types::{
    CredentialKind, CredentialSubTypePayload, CredentialType, FilterSet, GlobalCredential,
    GlobalCredentialsPayload, GlobalCredentialsQuery, SparseRecord,
};

pub use error::{CredentialError, CredentialResult, Diagnostic, Diagnostics, Severity};

pub use state::{
    next_synthetic_id, InputAccessor, MapInput, MemoryState, StateContainer, StateError,
};

pub use normalize::{normalize_credential, normalize_credentials, normalize_sub_type};

pub use resolver::{ConfigResolver, Method, MethodResolver, Resolution, ResolvedConfig};

pub use backend::{
    CredentialBackend, Exchange, HttpBackend, MockBackend, MockReply, RawResponse,
    TransportError,
};

pub use config::{
    AuthConfig, ClientConfig, ConfigError, ConfigProvider, EnvConfigProvider,
    FileConfigProvider, MemoryConfigProvider, PartialConfig,
};

pub use logging::{ConsoleLogger, Logger, NoOpLogger, SharedLogger};

pub use datasource::{GlobalCredentialDataSource, ReadOutcome};
