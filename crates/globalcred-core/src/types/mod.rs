//! Core types for global credential lookup

mod credential;
mod filters;
pub(crate) mod lenient;

pub use credential::{
    CredentialKind, CredentialSubTypePayload, CredentialType, GlobalCredential,
    GlobalCredentialsPayload, UntypedFields,
};
pub use filters::{FilterSet, GlobalCredentialsQuery};

/// A normalized output record: only applicable, non-empty fields are present
pub type SparseRecord = serde_json::Map<String, serde_json::Value>;
