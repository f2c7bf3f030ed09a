//! Global credential records as returned by the backend

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lenient;

/// Discriminant carried in `credentialType`
///
/// Matching is exact, the backend always reports these tags in upper case.
/// Anything else lands in `Other` with the raw tag preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialType {
    Cli,
    SnmpV3,
    SnmpV2ReadCommunity,
    SnmpV2WriteCommunity,
    HttpRead,
    HttpWrite,
    Netconf,
    Other(String),
}

impl CredentialType {
    /// All tags the backend documents, in the order it lists them
    pub const KNOWN: [CredentialType; 7] = [
        CredentialType::Cli,
        CredentialType::SnmpV2ReadCommunity,
        CredentialType::SnmpV2WriteCommunity,
        CredentialType::SnmpV3,
        CredentialType::HttpWrite,
        CredentialType::HttpRead,
        CredentialType::Netconf,
    ];

    pub fn parse(tag: &str) -> Self {
        match tag {
            "CLI" => CredentialType::Cli,
            "SNMPV3" => CredentialType::SnmpV3,
            "SNMPV2_READ_COMMUNITY" => CredentialType::SnmpV2ReadCommunity,
            "SNMPV2_WRITE_COMMUNITY" => CredentialType::SnmpV2WriteCommunity,
            "HTTP_READ" => CredentialType::HttpRead,
            "HTTP_WRITE" => CredentialType::HttpWrite,
            "NETCONF" => CredentialType::Netconf,
            other => CredentialType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CredentialType::Cli => "CLI",
            CredentialType::SnmpV3 => "SNMPV3",
            CredentialType::SnmpV2ReadCommunity => "SNMPV2_READ_COMMUNITY",
            CredentialType::SnmpV2WriteCommunity => "SNMPV2_WRITE_COMMUNITY",
            CredentialType::HttpRead => "HTTP_READ",
            CredentialType::HttpWrite => "HTTP_WRITE",
            CredentialType::Netconf => "NETCONF",
            CredentialType::Other(tag) => tag,
        }
    }

    /// Whether this is one of the documented tags
    pub fn is_known(&self) -> bool {
        !matches!(self, CredentialType::Other(_))
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stored credential, superset of every kind's fields
///
/// Only the subset relevant to `credential_type` carries meaning. Use
/// [`CredentialKind::from_record`] to get at the typed view.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalCredential {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub instance_uuid: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub instance_tenant_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub comments: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub credential_type: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub password: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub enable_password: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub auth_password: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub auth_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub privacy_password: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub privacy_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub snmp_mode: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub read_community: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub write_community: String,

    #[serde(default, deserialize_with = "lenient::port")]
    pub port: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub secure: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub netconf_port: String,
}

impl GlobalCredential {
    /// Create a record with just the identity and discriminant set
    pub fn new(id: impl Into<String>, credential_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            credential_type: credential_type.into(),
            ..Default::default()
        }
    }

    /// Parsed discriminant
    pub fn kind_tag(&self) -> CredentialType {
        CredentialType::parse(&self.credential_type)
    }
}

fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "**REDACTED**"
    }
}

// Hand-written so secrets never reach a log line through `{:?}`.
impl fmt::Debug for GlobalCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalCredential")
            .field("id", &self.id)
            .field("instance_uuid", &self.instance_uuid)
            .field("instance_tenant_id", &self.instance_tenant_id)
            .field("comments", &self.comments)
            .field("description", &self.description)
            .field("credential_type", &self.credential_type)
            .field("username", &self.username)
            .field("password", &mask(&self.password))
            .field("enable_password", &mask(&self.enable_password))
            .field("auth_password", &mask(&self.auth_password))
            .field("auth_type", &self.auth_type)
            .field("privacy_password", &mask(&self.privacy_password))
            .field("privacy_type", &self.privacy_type)
            .field("snmp_mode", &self.snmp_mode)
            .field("read_community", &self.read_community)
            .field("write_community", &self.write_community)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("netconf_port", &self.netconf_port)
            .finish()
    }
}

/// Response envelope of `GET /dna/intent/api/v2/global-credential`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalCredentialsPayload {
    /// `None` when the backend omitted or nulled the list
    #[serde(default)]
    pub response: Option<Vec<GlobalCredential>>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,
}

/// Response of `GET /dna/intent/api/v1/global-credential/{id}`
///
/// `response` names the credential class, e.g. `CLICredential` or
/// `SNMPv3Credential`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSubTypePayload {
    #[serde(default, deserialize_with = "lenient::string")]
    pub response: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_zero(port: Option<i64>) -> Option<i64> {
    port.filter(|p| *p != 0)
}

/// Every type-specific field, kept for tags we don't recognise
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UntypedFields {
    pub username: Option<String>,
    pub password: Option<String>,
    pub enable_password: Option<String>,
    pub netconf_port: Option<String>,
    pub read_community: Option<String>,
    pub write_community: Option<String>,
    pub auth_password: Option<String>,
    pub auth_type: Option<String>,
    pub privacy_password: Option<String>,
    pub privacy_type: Option<String>,
    pub snmp_mode: Option<String>,
    pub secure: Option<String>,
    pub port: Option<i64>,
}

/// Typed view of a credential: one variant per kind, each carrying only
/// the fields that kind uses
///
/// Empty strings and a zero port are already folded to `None`. Values are
/// otherwise untouched (no trimming, no masking).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialKind {
    Cli {
        username: Option<String>,
        password: Option<String>,
        enable_password: Option<String>,
    },
    SnmpV3 {
        username: Option<String>,
        auth_password: Option<String>,
        auth_type: Option<String>,
        privacy_password: Option<String>,
        privacy_type: Option<String>,
        snmp_mode: Option<String>,
    },
    SnmpV2Read {
        read_community: Option<String>,
    },
    SnmpV2Write {
        write_community: Option<String>,
    },
    /// Both `HTTP_READ` and `HTTP_WRITE`
    Http {
        username: Option<String>,
        password: Option<String>,
        port: Option<i64>,
        secure: Option<String>,
    },
    Netconf {
        netconf_port: Option<String>,
    },
    Other(Box<UntypedFields>),
}

impl CredentialKind {
    pub fn from_record(record: &GlobalCredential) -> Self {
        match record.kind_tag() {
            CredentialType::Cli => CredentialKind::Cli {
                username: non_empty(&record.username),
                password: non_empty(&record.password),
                enable_password: non_empty(&record.enable_password),
            },
            CredentialType::SnmpV3 => CredentialKind::SnmpV3 {
                username: non_empty(&record.username),
                auth_password: non_empty(&record.auth_password),
                auth_type: non_empty(&record.auth_type),
                privacy_password: non_empty(&record.privacy_password),
                privacy_type: non_empty(&record.privacy_type),
                snmp_mode: non_empty(&record.snmp_mode),
            },
            CredentialType::SnmpV2ReadCommunity => CredentialKind::SnmpV2Read {
                read_community: non_empty(&record.read_community),
            },
            CredentialType::SnmpV2WriteCommunity => CredentialKind::SnmpV2Write {
                write_community: non_empty(&record.write_community),
            },
            CredentialType::HttpRead | CredentialType::HttpWrite => CredentialKind::Http {
                username: non_empty(&record.username),
                password: non_empty(&record.password),
                port: non_zero(record.port),
                secure: non_empty(&record.secure),
            },
            CredentialType::Netconf => CredentialKind::Netconf {
                netconf_port: non_empty(&record.netconf_port),
            },
            CredentialType::Other(_) => CredentialKind::Other(Box::new(UntypedFields {
                username: non_empty(&record.username),
                password: non_empty(&record.password),
                enable_password: non_empty(&record.enable_password),
                netconf_port: non_empty(&record.netconf_port),
                read_community: non_empty(&record.read_community),
                write_community: non_empty(&record.write_community),
                auth_password: non_empty(&record.auth_password),
                auth_type: non_empty(&record.auth_type),
                privacy_password: non_empty(&record.privacy_password),
                privacy_type: non_empty(&record.privacy_type),
                snmp_mode: non_empty(&record.snmp_mode),
                secure: non_empty(&record.secure),
                port: non_zero(record.port),
            })),
        }
    }
}
