//! Caller-supplied lookup filters

use crate::schema::input;
use crate::state::InputAccessor;

/// Optional filters collected from the caller
///
/// Two groups: the list filters (`credential_sub_type`, `sort_by`,
/// `order`) and the lookup key (`id`). `None` always means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub credential_sub_type: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub id: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every filter from an input accessor
    pub fn from_input(input: &dyn InputAccessor) -> Self {
        Self {
            credential_sub_type: input.get(input::CREDENTIAL_SUB_TYPE),
            sort_by: input.get(input::SORT_BY),
            order: input.get(input::ORDER),
            id: input.get(input::ID),
        }
    }

    pub fn with_credential_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.credential_sub_type = Some(sub_type.into());
        self
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Presence flags of the list filters, in declaration order
    pub fn list_presence(&self) -> Vec<bool> {
        vec![
            self.credential_sub_type.is_some(),
            self.sort_by.is_some(),
            self.order.is_some(),
        ]
    }

    /// Presence flags of the lookup key
    pub fn lookup_presence(&self) -> Vec<bool> {
        vec![self.id.is_some()]
    }

    /// Query for the list operation, carrying only the supplied filters
    pub fn list_query(&self) -> GlobalCredentialsQuery {
        GlobalCredentialsQuery {
            credential_sub_type: self.credential_sub_type.clone(),
            sort_by: self.sort_by.clone(),
            order: self.order.clone(),
        }
    }
}

/// Query parameters for `GET /dna/intent/api/v2/global-credential`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalCredentialsQuery {
    /// `CLI`, `SNMPV2_READ_COMMUNITY`, ... as understood by the backend
    pub credential_sub_type: Option<String>,
    /// Backend sorts by `instanceId` when unset
    pub sort_by: Option<String>,
    /// `asc` or `des`
    pub order: Option<String>,
}

impl GlobalCredentialsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire parameters; absent filters are left out entirely
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(sub_type) = &self.credential_sub_type {
            pairs.push(("credentialSubType", sub_type.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order", order.clone()));
        }
        pairs
    }
}
