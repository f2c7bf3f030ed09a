//! Normalization of the credential sub type lookup

use serde_json::Value;

use crate::types::{CredentialSubTypePayload, SparseRecord};

/// `{response, version}` record, or `None` when there is no payload
pub fn normalize_sub_type(payload: Option<&CredentialSubTypePayload>) -> Option<SparseRecord> {
    let payload = payload?;
    let mut record = SparseRecord::new();
    record.insert("response".into(), Value::String(payload.response.clone()));
    record.insert("version".into(), Value::String(payload.version.clone()));
    Some(record)
}
