//! Mock transport for testing

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;

use super::{CredentialBackend, Exchange, RawResponse, TransportError, TransportResult};
use crate::types::{CredentialSubTypePayload, GlobalCredentialsPayload, GlobalCredentialsQuery};

/// Canned reply for one mocked operation
#[derive(Debug, Clone)]
pub enum MockReply<T> {
    /// Successful call with a decoded payload
    Payload(T),
    /// Successful call whose body decoded to nothing
    Empty(Option<RawResponse>),
    /// Failed call, optionally with the body the backend sent
    Fail {
        message: String,
        raw: Option<RawResponse>,
    },
    /// 2xx response decoded the way `HttpBackend` decodes it
    Body(RawResponse),
}

impl<T: Clone + DeserializeOwned> MockReply<T> {
    fn to_result(&self) -> TransportResult<Exchange<T>> {
        match self {
            Self::Body(raw) => match serde_json::from_str::<Option<T>>(&raw.body) {
                Ok(payload) => Ok(Exchange::new(payload, Some(raw.clone()))),
                Err(source) => Err(TransportError::Decode {
                    source,
                    raw: raw.clone(),
                }),
            },
            Self::Payload(payload) => Ok(Exchange::payload(payload.clone())),
            Self::Empty(raw) => Ok(Exchange::empty(raw.clone())),
            Self::Fail { message, raw } => Err(match raw {
                Some(raw) => TransportError::Status { raw: raw.clone() },
                None => TransportError::Other(message.clone()),
            }),
        }
    }
}

/// Mock backend with canned replies and call counters
pub struct MockBackend {
    credentials: RwLock<MockReply<GlobalCredentialsPayload>>,
    sub_type: RwLock<MockReply<CredentialSubTypePayload>>,
    list_calls: AtomicUsize,
    lookup_calls: AtomicUsize,
    last_query: RwLock<Option<GlobalCredentialsQuery>>,
    last_id: RwLock<Option<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Both operations succeed with empty payloads
    pub fn new() -> Self {
        Self {
            credentials: RwLock::new(MockReply::Payload(GlobalCredentialsPayload::default())),
            sub_type: RwLock::new(MockReply::Payload(CredentialSubTypePayload::default())),
            list_calls: AtomicUsize::new(0),
            lookup_calls: AtomicUsize::new(0),
            last_query: RwLock::new(None),
            last_id: RwLock::new(None),
        }
    }

    pub fn with_credentials(self, payload: GlobalCredentialsPayload) -> Self {
        self.set_credentials_reply(MockReply::Payload(payload));
        self
    }

    pub fn with_sub_type(self, payload: CredentialSubTypePayload) -> Self {
        self.set_sub_type_reply(MockReply::Payload(payload));
        self
    }

    pub fn set_credentials_reply(&self, reply: MockReply<GlobalCredentialsPayload>) {
        *self.credentials.write() = reply;
    }

    pub fn set_sub_type_reply(&self, reply: MockReply<CredentialSubTypePayload>) {
        *self.sub_type.write() = reply;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    /// Total number of backend calls
    pub fn calls(&self) -> usize {
        self.list_calls() + self.lookup_calls()
    }

    pub fn last_query(&self) -> Option<GlobalCredentialsQuery> {
        self.last_query.read().clone()
    }

    pub fn last_id(&self) -> Option<String> {
        self.last_id.read().clone()
    }
}

#[async_trait]
impl CredentialBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_global_credentials(
        &self,
        query: &GlobalCredentialsQuery,
    ) -> TransportResult<Exchange<GlobalCredentialsPayload>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.write() = Some(query.clone());
        self.credentials.read().to_result()
    }

    async fn get_credential_sub_type_by_id(
        &self,
        id: &str,
    ) -> TransportResult<Exchange<CredentialSubTypePayload>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_id.write() = Some(id.to_string());
        self.sub_type.read().to_result()
    }
}
