//! Global credential data source
//!
//! Reads the caller's filters, picks one backend operation, normalizes the
//! response and writes it into the host's state container.
//!
//! ```rust,ignore
//! use globalcred_core::{GlobalCredentialDataSource, MapInput, MemoryState};
//!
//! let source = GlobalCredentialDataSource::from_config(&config)?;
//! let input = MapInput::new().with("credential_sub_type", "CLI");
//! let state = MemoryState::new();
//! source.read(&input, &state).await?;
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::backend::{CredentialBackend, HttpBackend, TransportError};
use crate::config::ClientConfig;
use crate::error::{CredentialError, CredentialResult, Diagnostics};
use crate::logging::{ConsoleLogger, FileLogger, LogLevel, SharedLogger};
use crate::normalize::{normalize_credentials, normalize_sub_type};
use crate::resolver::{Method, MethodResolver, Resolution};
use crate::schema::{self, output};
use crate::state::{next_synthetic_id, InputAccessor, StateContainer};
use crate::types::{FilterSet, GlobalCredentialsQuery, SparseRecord};
use crate::{log_debug, log_error};

/// What a successful read did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// `items` was written with this many records
    Listed { count: usize },
    /// `item` was written
    SubTypeResolved,
    /// No filter was supplied; nothing was fetched or written
    NoOp,
}

/// Read-only data source over a credential backend
pub struct GlobalCredentialDataSource<B: CredentialBackend> {
    backend: B,
    resolver: MethodResolver,
    logger: SharedLogger,
}

impl GlobalCredentialDataSource<HttpBackend> {
    /// Data source talking to a live controller
    ///
    /// With `debug` set, logs go to stderr at debug level instead of the
    /// debug file.
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let source = Self::new(HttpBackend::new(config)?);
        if config.debug {
            return Ok(source.with_logger(Arc::new(
                ConsoleLogger::new().with_min_level(LogLevel::Debug),
            )));
        }
        Ok(source)
    }
}

impl<B: CredentialBackend> GlobalCredentialDataSource<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            resolver: MethodResolver::new(),
            logger: Arc::new(FileLogger::new("datasource")),
        }
    }

    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn resolver(&self) -> &MethodResolver {
        &self.resolver
    }

    /// Fetch and normalize the credential list
    ///
    /// Only the filters set in `query` are sent.
    pub async fn list_credentials(
        &self,
        query: &GlobalCredentialsQuery,
    ) -> CredentialResult<Vec<SparseRecord>> {
        let method = Method::GetGlobalCredentials;
        log_debug!(self.logger, "Sending {} with {:?}", method, query);

        let exchange = self
            .backend
            .get_global_credentials(query)
            .await
            .map_err(|err| self.backend_error(method, err))?;

        let payload = match exchange.payload {
            Some(payload) => payload,
            None => return Err(self.unexpected_response(method, exchange.raw.map(|raw| raw.body))),
        };

        let items = normalize_credentials(payload.response.as_deref());
        self.log_records(method, output::ITEMS, &items);
        Ok(items)
    }

    /// Fetch the credential class of the credential with `id`
    pub async fn lookup_kind_by_id(&self, id: &str) -> CredentialResult<SparseRecord> {
        let method = Method::GetCredentialSubTypeByCredentialId;
        if id.is_empty() {
            return Err(CredentialError::invalid_argument("id must not be empty"));
        }
        log_debug!(self.logger, "Sending {} for id {}", method, id);

        let exchange = self
            .backend
            .get_credential_sub_type_by_id(id)
            .await
            .map_err(|err| self.backend_error(method, err))?;

        let raw = exchange.raw.map(|raw| raw.body);
        match normalize_sub_type(exchange.payload.as_ref()) {
            Some(record) => {
                self.log_records(method, output::ITEM, std::slice::from_ref(&record));
                Ok(record)
            }
            None => Err(self.unexpected_response(method, raw)),
        }
    }

    /// Resolve the method from `input`, run it and write the result into `state`
    ///
    /// On failure nothing is written and no id is assigned.
    pub async fn read(
        &self,
        input: &dyn InputAccessor,
        state: &dyn StateContainer,
    ) -> Result<ReadOutcome, Diagnostics> {
        let filters = FilterSet::from_input(input);

        let method = match self.resolver.resolve_logged(&filters, &self.logger) {
            Resolution::Selected(method) => method,
            Resolution::NoOp => return Ok(ReadOutcome::NoOp),
        };

        let (field, value, outcome) = match method {
            Method::GetGlobalCredentials => {
                let items = self.list_credentials(&filters.list_query()).await?;
                let count = items.len();
                (output::ITEMS, to_list(items), ReadOutcome::Listed { count })
            }
            Method::GetCredentialSubTypeByCredentialId => {
                let id = filters.id.as_deref().unwrap_or_default();
                let item = self.lookup_kind_by_id(id).await?;
                (output::ITEM, to_list(vec![item]), ReadOutcome::SubTypeResolved)
            }
        };

        state.set(field, value).map_err(|source| {
            self.logger.error(&format!("Failed to set {}: {}", field, source));
            CredentialError::state_write(field, method.operation_name(), source)
        })?;
        state.set_id(&next_synthetic_id());

        Ok(outcome)
    }

    fn backend_error(&self, method: Method, err: TransportError) -> CredentialError {
        log_error!(self.logger, "{} failed on {}: {}", method, self.backend.name(), err);
        let body = err.error_body().map(str::to_string);
        CredentialError::backend(method.operation_name(), err.to_string(), body)
    }

    fn unexpected_response(&self, method: Method, body: Option<String>) -> CredentialError {
        log_error!(self.logger, "{} returned no payload", method);
        CredentialError::backend(
            method.operation_name(),
            format!("Failure at {}, unexpected response", method.operation_name()),
            body,
        )
    }

    fn log_records(&self, method: Method, block: &str, records: &[SparseRecord]) {
        let masked: Vec<SparseRecord> = records
            .iter()
            .map(|record| schema::mask_record(block, record))
            .collect();
        self.logger
            .debug(&format!("Retrieved response from {}: {:?}", method, masked));
    }
}

fn to_list(records: Vec<SparseRecord>) -> Value {
    Value::Array(records.into_iter().map(Value::Object).collect())
}
