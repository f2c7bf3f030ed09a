//! Per-kind projection of global credential records

use serde_json::Value;

use crate::types::{CredentialKind, GlobalCredential, SparseRecord, UntypedFields};

fn put_str(record: &mut SparseRecord, name: &str, value: &Option<String>) {
    if let Some(v) = value {
        record.insert(name.to_string(), Value::String(v.clone()));
    }
}

fn put_int(record: &mut SparseRecord, name: &str, value: Option<i64>) {
    if let Some(v) = value {
        record.insert(name.to_string(), Value::from(v));
    }
}

fn put_untyped(record: &mut SparseRecord, fields: &UntypedFields) {
    put_str(record, "username", &fields.username);
    put_str(record, "password", &fields.password);
    put_str(record, "enable_password", &fields.enable_password);
    put_str(record, "netconf_port", &fields.netconf_port);
    put_str(record, "read_community", &fields.read_community);
    put_str(record, "write_community", &fields.write_community);
    put_str(record, "auth_password", &fields.auth_password);
    put_str(record, "auth_type", &fields.auth_type);
    put_str(record, "privacy_password", &fields.privacy_password);
    put_str(record, "privacy_type", &fields.privacy_type);
    put_str(record, "snmp_mode", &fields.snmp_mode);
    put_str(record, "secure", &fields.secure);
    put_int(record, "port", fields.port);
}

/// Normalize one credential
///
/// The common identity fields are always present, even when empty. The
/// kind-specific fields appear only when the kind uses them and the
/// backend sent a non-empty (or non-zero) value.
pub fn normalize_credential(credential: &GlobalCredential) -> SparseRecord {
    let mut record = SparseRecord::new();
    record.insert("comments".into(), Value::String(credential.comments.clone()));
    record.insert(
        "credential_type".into(),
        Value::String(credential.credential_type.clone()),
    );
    record.insert(
        "description".into(),
        Value::String(credential.description.clone()),
    );
    record.insert("id".into(), Value::String(credential.id.clone()));
    record.insert(
        "instance_tenant_id".into(),
        Value::String(credential.instance_tenant_id.clone()),
    );
    record.insert(
        "instance_uuid".into(),
        Value::String(credential.instance_uuid.clone()),
    );

    match CredentialKind::from_record(credential) {
        CredentialKind::Cli {
            username,
            password,
            enable_password,
        } => {
            put_str(&mut record, "username", &username);
            put_str(&mut record, "password", &password);
            put_str(&mut record, "enable_password", &enable_password);
        }
        CredentialKind::SnmpV3 {
            username,
            auth_password,
            auth_type,
            privacy_password,
            privacy_type,
            snmp_mode,
        } => {
            put_str(&mut record, "username", &username);
            put_str(&mut record, "auth_password", &auth_password);
            put_str(&mut record, "auth_type", &auth_type);
            put_str(&mut record, "privacy_password", &privacy_password);
            put_str(&mut record, "privacy_type", &privacy_type);
            put_str(&mut record, "snmp_mode", &snmp_mode);
        }
        CredentialKind::SnmpV2Read { read_community } => {
            put_str(&mut record, "read_community", &read_community);
        }
        CredentialKind::SnmpV2Write { write_community } => {
            put_str(&mut record, "write_community", &write_community);
        }
        CredentialKind::Http {
            username,
            password,
            port,
            secure,
        } => {
            put_str(&mut record, "username", &username);
            put_str(&mut record, "password", &password);
            put_int(&mut record, "port", port);
            put_str(&mut record, "secure", &secure);
        }
        CredentialKind::Netconf { netconf_port } => {
            put_str(&mut record, "netconf_port", &netconf_port);
        }
        CredentialKind::Other(fields) => put_untyped(&mut record, &fields),
    }

    record
}

/// Normalize a credential list, keeping backend order
///
/// `None` and an empty slice both give an empty list.
pub fn normalize_credentials(credentials: Option<&[GlobalCredential]>) -> Vec<SparseRecord> {
    credentials
        .unwrap_or_default()
        .iter()
        .map(normalize_credential)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{fields_for_kind, COMMON_FIELDS};
    use crate::types::CredentialType;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn keys(record: &SparseRecord) -> BTreeSet<&str> {
        record.keys().map(|k| k.as_str()).collect()
    }

    fn expected(extra: &[&'static str]) -> BTreeSet<&'static str> {
        COMMON_FIELDS.iter().copied().chain(extra.iter().copied()).collect()
    }

    /// Record with every type-specific field filled in
    fn loaded(id: &str, tag: &str) -> GlobalCredential {
        GlobalCredential {
            id: id.to_string(),
            instance_uuid: format!("uuid-{}", id),
            instance_tenant_id: "tenant".to_string(),
            comments: "c".to_string(),
            description: "d".to_string(),
            credential_type: tag.to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            enable_password: "enable".to_string(),
            auth_password: "authpass".to_string(),
            auth_type: "SHA".to_string(),
            privacy_password: "privpass".to_string(),
            privacy_type: "AES128".to_string(),
            snmp_mode: "AUTHPRIV".to_string(),
            read_community: "public".to_string(),
            write_community: "private".to_string(),
            port: Some(443),
            secure: "true".to_string(),
            netconf_port: "830".to_string(),
        }
    }

    #[test]
    fn test_cli_drops_empty_and_foreign_fields() {
        let mut cred = GlobalCredential::new("c1", "CLI");
        cred.username = "u".to_string();
        cred.password = "p".to_string();
        cred.enable_password = String::new();
        cred.auth_type = "X".to_string();

        let record = normalize_credential(&cred);
        assert_eq!(keys(&record), expected(&["username", "password"]));
        assert_eq!(record["username"], json!("u"));
        assert_eq!(record["password"], json!("p"));
    }

    #[test]
    fn test_netconf_only_port() {
        let mut cred = GlobalCredential::new("n1", "NETCONF");
        cred.netconf_port = "830".to_string();

        let record = normalize_credential(&cred);
        assert_eq!(keys(&record), expected(&["netconf_port"]));
        assert_eq!(record["netconf_port"], json!("830"));
    }

    #[test]
    fn test_http_port_zero_omitted() {
        let mut cred = GlobalCredential::new("h1", "HTTP_READ");
        cred.port = Some(0);
        assert!(!normalize_credential(&cred).contains_key("port"));

        cred.port = Some(443);
        let record = normalize_credential(&cred);
        assert_eq!(record["port"], json!(443));
    }

    #[test]
    fn test_common_fields_always_present() {
        let record = normalize_credential(&GlobalCredential::new("", "SNMPV2_READ_COMMUNITY"));
        assert_eq!(keys(&record), expected(&[]));
        assert_eq!(record["id"], json!(""));
        assert_eq!(record["credential_type"], json!("SNMPV2_READ_COMMUNITY"));
    }

    #[test]
    fn test_snmpv2_communities() {
        let read = normalize_credential(&loaded("r1", "SNMPV2_READ_COMMUNITY"));
        assert_eq!(keys(&read), expected(&["read_community"]));
        assert_eq!(read["read_community"], json!("public"));

        let write = normalize_credential(&loaded("w1", "SNMPV2_WRITE_COMMUNITY"));
        assert_eq!(keys(&write), expected(&["write_community"]));
        assert_eq!(write["write_community"], json!("private"));
    }

    #[test]
    fn test_snmpv3_fields() {
        let record = normalize_credential(&loaded("s1", "SNMPV3"));
        assert_eq!(
            keys(&record),
            expected(&[
                "username",
                "auth_password",
                "auth_type",
                "privacy_password",
                "privacy_type",
                "snmp_mode",
            ])
        );
        assert_eq!(record["snmp_mode"], json!("AUTHPRIV"));
    }

    #[test]
    fn test_unknown_kind_keeps_all_non_empty() {
        let record = normalize_credential(&loaded("x1", "HTTPS_READ"));
        assert_eq!(
            keys(&record),
            expected(fields_for_kind(&CredentialType::Other(String::new())))
        );

        let mut sparse = GlobalCredential::new("x2", "");
        sparse.read_community = "public".to_string();
        let record = normalize_credential(&sparse);
        assert_eq!(keys(&record), expected(&["read_community"]));
    }

    #[test]
    fn test_no_field_outside_kind_table() {
        let mut tags: Vec<String> = CredentialType::KNOWN
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();
        tags.push("SOMETHING_NEW".to_string());

        for tag in &tags {
            let record = normalize_credential(&loaded("k", tag));
            let allowed = expected(fields_for_kind(&CredentialType::parse(tag)));
            for key in record.keys() {
                assert!(
                    allowed.contains(key.as_str()),
                    "{} leaked into a {} record",
                    key,
                    tag
                );
            }
            // every allowed field was populated in the fixture, so all must appear
            assert_eq!(keys(&record), allowed, "projection of {}", tag);
        }
    }

    #[test]
    fn test_values_preserved_exactly() {
        let mut cred = GlobalCredential::new("c1", "CLI");
        cred.password = " p@ss word ".to_string();
        cred.enable_password = "\tenable\n".to_string();

        let record = normalize_credential(&cred);
        assert_eq!(record["password"], json!(" p@ss word "));
        assert_eq!(record["enable_password"], json!("\tenable\n"));
    }

    #[test]
    fn test_list_empty_and_none() {
        assert!(normalize_credentials(None).is_empty());
        assert!(normalize_credentials(Some(&[])).is_empty());
    }

    #[test]
    fn test_list_preserves_order_and_duplicates() {
        let creds = vec![
            GlobalCredential::new("b", "CLI"),
            GlobalCredential::new("a", "NETCONF"),
            GlobalCredential::new("b", "CLI"),
        ];
        let records = normalize_credentials(Some(&creds));
        let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["b", "a", "b"]);
    }
}
