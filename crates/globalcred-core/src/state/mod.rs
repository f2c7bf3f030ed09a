//! Collaborator seams between the data source and its host
//!
//! The host framework supplies an [`InputAccessor`] for the filters and a
//! [`StateContainer`] that receives the normalized result. In-memory
//! implementations live in this module for tests and embedding.

mod id;
mod memory;

use serde_json::Value;
use thiserror::Error;

pub use id::{next_synthetic_id, SyntheticIdGenerator};
pub use memory::{MapInput, MemoryState};

/// Errors raised while writing results into a state container
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Unknown output field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("State error: {0}")]
    Other(String),
}

impl StateError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type StateResult<T> = Result<T, StateError>;

/// Source of caller-supplied input fields
///
/// `None` means the field was omitted. Implementations must never report an
/// omitted field as its zero value.
pub trait InputAccessor: Send + Sync {
    fn get(&self, field: &str) -> Option<String>;

    fn is_present(&self, field: &str) -> bool {
        self.get(field).is_some()
    }
}

/// Receiver of normalized output
///
/// Implementations:
/// - `MemoryState`: validates against the output schema and keeps values in memory
/// - Host adapters: forward into the declarative framework's resource data
pub trait StateContainer: Send + Sync {
    /// Write one top-level output field (`item` or `items`)
    fn set(&self, field: &str, value: Value) -> StateResult<()>;

    /// Assign the synthetic identifier of the result holder
    fn set_id(&self, id: &str);
}
