//! Selection of the backend operation from the supplied filters
//!
//! Rules are checked in declaration order and the first rule with any
//! filter present wins. With both the list filters and `id` supplied, the
//! listing runs and `id` is ignored. With nothing supplied, the resolver
//! answers [`Resolution::NoOp`] instead of guessing.

use std::fmt;

use crate::logging::SharedLogger;
use crate::types::FilterSet;

/// Backend operations the data source can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// List credentials with optional sub type filter and sorting
    GetGlobalCredentials,
    /// Report which credential class an id belongs to
    GetCredentialSubTypeByCredentialId,
}

impl Method {
    /// Operation name used in logs and diagnostics
    pub fn operation_name(&self) -> &'static str {
        match self {
            Method::GetGlobalCredentials => "GetGlobalCredentials",
            Method::GetCredentialSubTypeByCredentialId => "GetCredentialSubTypeByCredentialID",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation_name())
    }
}

/// Outcome of method selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Selected(Method),
    /// No filter group was active; nothing should be fetched
    NoOp,
}

/// One (predicate, strategy) pair
#[derive(Clone, Copy)]
pub struct MethodRule {
    pub method: Method,
    /// Presence flags of the filters that select `method`
    pub presence: fn(&FilterSet) -> Vec<bool>,
}

impl fmt::Debug for MethodRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodRule")
            .field("method", &self.method)
            .finish()
    }
}

/// Index of the first group with at least one flag set
pub fn pick_method(groups: &[Vec<bool>]) -> Option<usize> {
    groups.iter().position(|flags| flags.iter().any(|present| *present))
}

/// Priority-ordered method resolver
#[derive(Debug, Clone)]
pub struct MethodResolver {
    rules: Vec<MethodRule>,
}

impl Default for MethodResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodResolver {
    /// Resolver with the two global credential rules, listing first
    pub fn new() -> Self {
        Self {
            rules: vec![
                MethodRule {
                    method: Method::GetGlobalCredentials,
                    presence: FilterSet::list_presence,
                },
                MethodRule {
                    method: Method::GetCredentialSubTypeByCredentialId,
                    presence: FilterSet::lookup_presence,
                },
            ],
        }
    }

    pub fn rules(&self) -> &[MethodRule] {
        &self.rules
    }

    /// Presence groups for `filters`, one per rule in priority order
    pub fn presence_groups(&self, filters: &FilterSet) -> Vec<Vec<bool>> {
        self.rules.iter().map(|rule| (rule.presence)(filters)).collect()
    }

    /// Map ordered presence groups to a resolution
    ///
    /// Group `i` corresponds to the `i`-th rule.
    pub fn resolve_groups(&self, groups: &[Vec<bool>]) -> Resolution {
        match pick_method(groups).and_then(|index| self.rules.get(index)) {
            Some(rule) => Resolution::Selected(rule.method),
            None => Resolution::NoOp,
        }
    }

    /// Select the operation for a filter set
    pub fn resolve(&self, filters: &FilterSet) -> Resolution {
        self.resolve_groups(&self.presence_groups(filters))
    }

    /// Same as [`resolve`](Self::resolve), logging each group at debug level
    pub fn resolve_logged(&self, filters: &FilterSet, logger: &SharedLogger) -> Resolution {
        let groups = self.presence_groups(filters);
        for (index, flags) in groups.iter().enumerate() {
            logger.debug(&format!(
                "Selecting method. Method {} {:?}",
                index + 1,
                flags
            ));
        }
        let resolution = self.resolve_groups(&groups);
        match resolution {
            Resolution::Selected(method) => {
                logger.debug(&format!("Selected method: {}", method))
            }
            Resolution::NoOp => logger.debug("No filter supplied, nothing to read"),
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use std::sync::Arc;

    fn filters(sub_type: bool, sort_by: bool, order: bool, id: bool) -> FilterSet {
        FilterSet {
            credential_sub_type: sub_type.then(|| "CLI".to_string()),
            sort_by: sort_by.then(|| "description".to_string()),
            order: order.then(|| "asc".to_string()),
            id: id.then(|| "abc".to_string()),
        }
    }

    #[test]
    fn test_pick_method() {
        assert_eq!(pick_method(&[vec![false, true], vec![true]]), Some(0));
        assert_eq!(pick_method(&[vec![false], vec![true]]), Some(1));
        assert_eq!(pick_method(&[vec![false], vec![false]]), None);
        assert_eq!(pick_method(&[vec![], vec![]]), None);
        assert_eq!(pick_method(&[]), None);
    }

    #[test]
    fn test_resolver_truth_table() {
        let resolver = MethodResolver::new();

        for mask in 0u8..16 {
            let sub_type = mask & 1 != 0;
            let sort_by = mask & 2 != 0;
            let order = mask & 4 != 0;
            let id = mask & 8 != 0;
            let any_list = sub_type || sort_by || order;

            let expected = if any_list {
                Resolution::Selected(Method::GetGlobalCredentials)
            } else if id {
                Resolution::Selected(Method::GetCredentialSubTypeByCredentialId)
            } else {
                Resolution::NoOp
            };

            assert_eq!(
                resolver.resolve(&filters(sub_type, sort_by, order, id)),
                expected,
                "mask {:04b}",
                mask
            );
        }
    }

    #[test]
    fn test_list_filters_win_over_id() {
        let resolver = MethodResolver::new();
        let both = FilterSet::new().with_order("des").with_id("abc");
        assert_eq!(
            resolver.resolve(&both),
            Resolution::Selected(Method::GetGlobalCredentials)
        );
    }

    #[test]
    fn test_resolve_groups_out_of_range() {
        let resolver = MethodResolver::new();
        let groups = vec![vec![false], vec![false], vec![true]];
        assert_eq!(resolver.resolve_groups(&groups), Resolution::NoOp);
    }

    #[test]
    fn test_presence_groups_shape() {
        let resolver = MethodResolver::new();
        let groups = resolver.presence_groups(&FilterSet::new().with_sort_by("x"));
        assert_eq!(groups, vec![vec![false, true, false], vec![false]]);
        assert_eq!(resolver.rules().len(), 2);
    }

    #[test]
    fn test_resolve_logged_matches_resolve() {
        let resolver = MethodResolver::new();
        let logger: SharedLogger = Arc::new(NoOpLogger::new());
        let f = FilterSet::new().with_id("abc");
        assert_eq!(resolver.resolve_logged(&f, &logger), resolver.resolve(&f));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Method::GetGlobalCredentials.to_string(), "GetGlobalCredentials");
        assert_eq!(
            Method::GetCredentialSubTypeByCredentialId.operation_name(),
            "GetCredentialSubTypeByCredentialID"
        );
    }
}
