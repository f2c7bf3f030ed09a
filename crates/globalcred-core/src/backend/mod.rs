//! Backend transports for the global credential API
//!
//! A transport exposes the two read operations the data source needs:
//!
//! - `GET /dna/intent/api/v2/global-credential` (list, filtered and sorted)
//! - `GET /dna/intent/api/v1/global-credential/{id}` (credential sub type)
//!
//! Each call yields an [`Exchange`]: an optional decoded payload plus the raw
//! response, kept only so failures can be reported with the backend's own
//! text. A missing payload is a failure even when the HTTP status was fine.
//!
//! Implementations:
//! - `HttpBackend`: reqwest client against a live controller
//! - `MockBackend`: canned replies for tests and offline use

mod http;
mod mock;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{CredentialSubTypePayload, GlobalCredentialsPayload, GlobalCredentialsQuery};

pub use http::HttpBackend;
pub use mock::{MockBackend, MockReply};

/// Raw HTTP response retained for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body)
    }
}

/// Result of one backend round trip
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange<T> {
    pub payload: Option<T>,
    pub raw: Option<RawResponse>,
}

impl<T> Exchange<T> {
    pub fn new(payload: Option<T>, raw: Option<RawResponse>) -> Self {
        Self { payload, raw }
    }

    /// Exchange carrying a payload and no raw response
    pub fn payload(payload: T) -> Self {
        Self {
            payload: Some(payload),
            raw: None,
        }
    }

    /// Exchange with no payload
    pub fn empty(raw: Option<RawResponse>) -> Self {
        Self { payload: None, raw }
    }
}

/// Errors that can occur talking to the backend
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {}", .raw.status)]
    Status { raw: RawResponse },

    #[error("Failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: RawResponse,
    },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Raw response attached to the error, if the backend answered at all
    pub fn raw(&self) -> Option<&RawResponse> {
        match self {
            Self::Status { raw } | Self::Decode { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Body the backend sent as an error report, if any
    ///
    /// Only non-2xx bodies qualify. An undecodable 2xx body may carry
    /// credential secrets and never leaves the transport layer.
    pub fn error_body(&self) -> Option<&str> {
        match self {
            Self::Status { raw } => Some(&raw.body),
            _ => None,
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Transport for the global credential read operations
#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Short name for logs (`http`, `mock`, ...)
    fn name(&self) -> &str;

    /// List credentials; only the filters set in `query` are sent
    async fn get_global_credentials(
        &self,
        query: &GlobalCredentialsQuery,
    ) -> TransportResult<Exchange<GlobalCredentialsPayload>>;

    /// Credential class of the credential with `id`
    async fn get_credential_sub_type_by_id(
        &self,
        id: &str,
    ) -> TransportResult<Exchange<CredentialSubTypePayload>>;
}

#[async_trait]
impl<B: CredentialBackend + ?Sized> CredentialBackend for Arc<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn get_global_credentials(
        &self,
        query: &GlobalCredentialsQuery,
    ) -> TransportResult<Exchange<GlobalCredentialsPayload>> {
        (**self).get_global_credentials(query).await
    }

    async fn get_credential_sub_type_by_id(
        &self,
        id: &str,
    ) -> TransportResult<Exchange<CredentialSubTypePayload>> {
        (**self).get_credential_sub_type_by_id(id).await
    }
}
