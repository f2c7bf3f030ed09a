//! Input and output field descriptors of the global credential data source
//!
//! The normalizer emits raw values. Whether a value may be shown or logged
//! is decided here, by the `sensitive` flag on the output field, and
//! enforced by whoever renders the state (see [`mask_record`]).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::types::{CredentialType, SparseRecord};

/// Placeholder written over sensitive values
pub const REDACTED: &str = "**REDACTED**";

/// Names of the input fields
pub mod input {
    pub const CREDENTIAL_SUB_TYPE: &str = "credential_sub_type";
    pub const SORT_BY: &str = "sort_by";
    pub const ORDER: &str = "order";
    pub const ID: &str = "id";
}

/// Names of the top-level output fields
pub mod output {
    /// Result of the sub type lookup, a one-element list
    pub const ITEM: &str = "item";
    /// Result of the credential listing
    pub const ITEMS: &str = "items";
}

/// Value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Int,
}

impl FieldKind {
    /// Whether a JSON value fits this kind
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Int => value.is_i64() || value.is_u64(),
        }
    }
}

/// Descriptor of one schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub sensitive: bool,
}

impl FieldSchema {
    const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description,
            sensitive: false,
        }
    }

    const fn secret(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description,
            sensitive: true,
        }
    }

    const fn int(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Int,
            description,
            sensitive: false,
        }
    }
}

pub const INPUT_FIELDS: &[FieldSchema] = &[
    FieldSchema::string(
        input::CREDENTIAL_SUB_TYPE,
        "Credential type as CLI / SNMPV2_READ_COMMUNITY / SNMPV2_WRITE_COMMUNITY / SNMPV3 / HTTP_WRITE / HTTP_READ / NETCONF",
    ),
    FieldSchema::string(input::ID, "Global Credential ID"),
    FieldSchema::string(input::ORDER, "Order of sorting. 'asc' or 'des'"),
    FieldSchema::string(
        input::SORT_BY,
        "Field to sort the results by. Sorts by 'instanceId' if no value is provided",
    ),
];

pub const ITEM_FIELDS: &[FieldSchema] = &[
    FieldSchema::string(
        "response",
        "Credential type as 'CLICredential', 'HTTPReadCredential', 'HTTPWriteCredential', 'NetconfCredential', 'SNMPv2ReadCommunity', 'SNMPv2WriteCommunity', 'SNMPv3Credential'",
    ),
    FieldSchema::string("version", ""),
];

pub const ITEMS_FIELDS: &[FieldSchema] = &[
    FieldSchema::secret("auth_password", "SNMPV3 Auth Password"),
    FieldSchema::string("auth_type", "SNMPV3 Auth Type"),
    FieldSchema::string("comments", "Comments to identify the Global Credential"),
    FieldSchema::string(
        "credential_type",
        "Credential type to identify the application that uses the Global credential",
    ),
    FieldSchema::string("description", "Description for Global Credential"),
    FieldSchema::secret("enable_password", "CLI Enable Password"),
    FieldSchema::string("id", "Id of the Global Credential"),
    FieldSchema::string("instance_tenant_id", "Instance Tenant Id of the Global Credential"),
    FieldSchema::string("instance_uuid", "Instance Uuid of the Global Credential"),
    FieldSchema::string("netconf_port", "Netconf Port"),
    FieldSchema::secret("password", "CLI Password"),
    FieldSchema::int("port", "HTTP(S) port"),
    FieldSchema::secret("privacy_password", "SNMPV3 Privacy Password"),
    FieldSchema::string("privacy_type", "SNMPV3 Privacy Type"),
    FieldSchema::string("read_community", "SNMP Read Community"),
    FieldSchema::string("secure", "Flag for HTTP(S)"),
    FieldSchema::string("snmp_mode", "SNMP Mode"),
    FieldSchema::string("username", "CLI Username"),
    FieldSchema::string("write_community", "SNMP Write Community"),
];

/// Fields every normalized credential carries
pub const COMMON_FIELDS: &[&str] = &[
    "comments",
    "credential_type",
    "description",
    "id",
    "instance_tenant_id",
    "instance_uuid",
];

const CLI_FIELDS: &[&str] = &["username", "password", "enable_password"];
const SNMPV3_FIELDS: &[&str] = &[
    "username",
    "auth_password",
    "auth_type",
    "privacy_password",
    "privacy_type",
    "snmp_mode",
];
const SNMPV2_READ_FIELDS: &[&str] = &["read_community"];
const SNMPV2_WRITE_FIELDS: &[&str] = &["write_community"];
const HTTP_FIELDS: &[&str] = &["username", "password", "port", "secure"];
const NETCONF_FIELDS: &[&str] = &["netconf_port"];
const UNTYPED_FIELDS: &[&str] = &[
    "username",
    "password",
    "enable_password",
    "netconf_port",
    "read_community",
    "write_community",
    "auth_password",
    "auth_type",
    "privacy_password",
    "privacy_type",
    "snmp_mode",
    "secure",
    "port",
];

/// Type-specific output fields a credential kind may carry
pub fn fields_for_kind(kind: &CredentialType) -> &'static [&'static str] {
    match kind {
        CredentialType::Cli => CLI_FIELDS,
        CredentialType::SnmpV3 => SNMPV3_FIELDS,
        CredentialType::SnmpV2ReadCommunity => SNMPV2_READ_FIELDS,
        CredentialType::SnmpV2WriteCommunity => SNMPV2_WRITE_FIELDS,
        CredentialType::HttpRead | CredentialType::HttpWrite => HTTP_FIELDS,
        CredentialType::Netconf => NETCONF_FIELDS,
        CredentialType::Other(_) => UNTYPED_FIELDS,
    }
}

fn index(fields: &[FieldSchema]) -> HashMap<&'static str, FieldSchema> {
    fields.iter().map(|f| (f.name, *f)).collect()
}

static BLOCKS: Lazy<HashMap<&'static str, HashMap<&'static str, FieldSchema>>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(output::ITEM, index(ITEM_FIELDS));
    m.insert(output::ITEMS, index(ITEMS_FIELDS));
    m
});

/// Look up the descriptor of a field inside an output block
pub fn output_field(block: &str, name: &str) -> Option<&'static FieldSchema> {
    BLOCKS.get(block).and_then(|fields| fields.get(name))
}

/// Whether the block is one of the known output fields
pub fn is_output_block(block: &str) -> bool {
    BLOCKS.contains_key(block)
}

/// Whether a field in an output block must be hidden from display
pub fn is_sensitive(block: &str, name: &str) -> bool {
    output_field(block, name).map(|f| f.sensitive).unwrap_or(false)
}

/// Copy of a record with sensitive values replaced by [`REDACTED`]
pub fn mask_record(block: &str, record: &SparseRecord) -> SparseRecord {
    record
        .iter()
        .map(|(name, value)| {
            if is_sensitive(block, name) {
                (name.clone(), Value::String(REDACTED.to_string()))
            } else {
                (name.clone(), value.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_password_fields_are_sensitive() {
        for name in ["password", "enable_password", "auth_password", "privacy_password"] {
            assert!(is_sensitive(output::ITEMS, name), "{} should be sensitive", name);
        }
        assert!(!is_sensitive(output::ITEMS, "username"));
        assert!(!is_sensitive(output::ITEM, "response"));
        assert!(!is_sensitive("nope", "password"));
    }

    #[test]
    fn test_every_kind_field_is_declared() {
        let mut kinds: Vec<CredentialType> = CredentialType::KNOWN.to_vec();
        kinds.push(CredentialType::Other("FUTURE".to_string()));
        for kind in &kinds {
            for name in fields_for_kind(kind) {
                assert!(
                    output_field(output::ITEMS, name).is_some(),
                    "{} missing from items schema",
                    name
                );
            }
        }
        for name in COMMON_FIELDS {
            assert!(output_field(output::ITEMS, name).is_some());
        }
    }

    #[test]
    fn test_field_kind_accepts() {
        assert!(FieldKind::Int.accepts(&json!(443)));
        assert!(!FieldKind::Int.accepts(&json!("443")));
        assert!(FieldKind::String.accepts(&json!("x")));
        assert!(!FieldKind::String.accepts(&json!(null)));
    }

    #[test]
    fn test_mask_record() {
        let mut record = SparseRecord::new();
        record.insert("username".to_string(), json!("admin"));
        record.insert("password".to_string(), json!("hunter2"));
        record.insert("port".to_string(), json!(443));

        let masked = mask_record(output::ITEMS, &record);
        assert_eq!(masked["username"], json!("admin"));
        assert_eq!(masked["password"], json!(REDACTED));
        assert_eq!(masked["port"], json!(443));
        // source untouched
        assert_eq!(record["password"], json!("hunter2"));
    }

    #[test]
    fn test_input_fields_listed() {
        let names: Vec<&str> = INPUT_FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["credential_sub_type", "id", "order", "sort_by"]);
    }
}
