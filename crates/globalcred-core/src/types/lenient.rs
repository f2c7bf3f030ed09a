//! Tolerant field decoders for backend payloads
//!
//! Catalyst Center releases disagree on the JSON type of a few credential
//! fields (`port` is sometimes a string, `secure` sometimes a boolean, and
//! any field may be `null`). These helpers accept every form we have seen
//! and fold it into the representation the rest of the crate works with.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Decode a string field, accepting `null`, numbers and booleans.
///
/// `null` becomes the empty string so "missing" and "empty" look the same
/// to the normalizer.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Scalar> = Option::deserialize(deserializer)?;
    Ok(match value {
        None => String::new(),
        Some(Scalar::Str(s)) => s,
        Some(Scalar::Int(i)) => i.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}

/// Decode an integer port, accepting `null`, numbers and numeric strings.
///
/// Blank strings decode to `None`. Non-numeric strings are a decode error.
pub fn port<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("port out of range: {}", n))),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("invalid port: {:?}", s)))
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid port type: {}",
            other
        ))),
    }
}
