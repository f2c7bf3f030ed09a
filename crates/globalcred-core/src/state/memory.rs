//! In-memory input accessor and state container

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use serde_json::Value;

use super::{InputAccessor, StateContainer, StateError, StateResult};
use crate::schema;

/// Input accessor backed by a map
///
/// Empty strings count as omitted, the same way the declarative framework
/// reports an unset optional string.
///
/// # Example
///
/// ```
/// use globalcred_core::state::{InputAccessor, MapInput};
///
/// let input = MapInput::new().with("id", "abc").with("order", "");
/// assert_eq!(input.get("id"), Some("abc".to_string()));
/// assert_eq!(input.get("order"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapInput {
    values: HashMap<String, String>,
}

impl MapInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }
}

impl InputAccessor for MapInput {
    fn get(&self, field: &str) -> Option<String> {
        self.values.get(field).filter(|v| !v.is_empty()).cloned()
    }
}

/// In-memory state container
///
/// Only accepts the output fields the schema declares, and checks every
/// element is an object whose keys and value types match the schema.
///
/// # Thread Safety
///
/// Uses `RwLock` internally and is safe to share between threads.
#[derive(Default)]
pub struct MemoryState {
    fields: RwLock<HashMap<String, Value>>,
    id: RwLock<Option<String>>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of an output field, secrets included
    pub fn get(&self, field: &str) -> Option<Value> {
        self.fields.read().get(field).cloned()
    }

    /// Output field with sensitive values masked, for display
    pub fn get_masked(&self, field: &str) -> Option<Value> {
        self.get(field).map(|value| mask_value(field, value))
    }

    pub fn id(&self) -> Option<String> {
        self.id.read().clone()
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.fields.write().clear();
        *self.id.write() = None;
    }

    fn validate(field: &str, value: &Value) -> StateResult<()> {
        if !schema::is_output_block(field) {
            return Err(StateError::UnknownField(field.to_string()));
        }

        let elements = value
            .as_array()
            .ok_or_else(|| StateError::invalid_value(field, "expected a list"))?;

        for (index, element) in elements.iter().enumerate() {
            let object = element.as_object().ok_or_else(|| {
                StateError::invalid_value(field, format!("element {} is not an object", index))
            })?;
            for (name, inner) in object {
                let descriptor = schema::output_field(field, name).ok_or_else(|| {
                    StateError::invalid_value(field, format!("unknown attribute {}", name))
                })?;
                if !descriptor.kind.accepts(inner) {
                    return Err(StateError::invalid_value(
                        field,
                        format!("attribute {} expects {:?}", name, descriptor.kind),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn mask_value(field: &str, value: Value) -> Value {
    match value {
        Value::Array(elements) => Value::Array(
            elements
                .into_iter()
                .map(|element| match element {
                    Value::Object(record) => Value::Object(schema::mask_record(field, &record)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

impl StateContainer for MemoryState {
    fn set(&self, field: &str, value: Value) -> StateResult<()> {
        Self::validate(field, &value)?;
        self.fields.write().insert(field.to_string(), value);
        Ok(())
    }

    fn set_id(&self, id: &str) {
        *self.id.write() = Some(id.to_string());
    }
}

// Secrets are masked so a stray `{:?}` can't print them.
impl fmt::Debug for MemoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked: HashMap<String, Value> = self
            .fields
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), mask_value(k, v.clone())))
            .collect();
        f.debug_struct("MemoryState")
            .field("id", &self.id())
            .field("fields", &masked)
            .finish()
    }
}
