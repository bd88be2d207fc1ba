//! Job search query engine.
//!
//! Turns the raw query parameters of `GET /jobs` into a typed search
//! descriptor: filter expression, sort order, field selection and
//! pagination window. Radius search builds a [`RadiusQuery`] from a
//! geocoded postal code instead.
//!
//! Everything here is a pure function of its inputs. The storage layer
//! turns the descriptor into SQL; the only I/O is the geocoder call made by
//! [`build_radius_query`].

mod filter;
mod pagination;
mod radius;
mod select;
mod sort;

use serde::Deserialize;

use crate::error::CoreError;

pub use filter::{Comparison, ComparisonOp, FieldPredicate, FilterExpression};
pub use pagination::{PageRef, PaginationResult, PaginationWindow};
pub use radius::{
    angular_distance, build_radius_query, build_radius_query_in, parse_distance, DistanceUnit,
    RadiusQuery, EARTH_RADIUS_KM, EARTH_RADIUS_MILES,
};
pub use select::FieldSelection;
pub use sort::{SortDirection, SortKey, SortSpec, DEFAULT_SORT_FIELD};

// ---------------------------------------------------------------------------
// Reserved parameters
// ---------------------------------------------------------------------------

pub const PARAM_SELECT: &str = "select";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_RADIUS: &str = "radius";
pub const PARAM_ZIPCODE: &str = "zipcode";

/// Query modifiers that are never treated as field filters.
pub const RESERVED_PARAMS: &[&str] = &[
    PARAM_SELECT,
    PARAM_SORT,
    PARAM_PAGE,
    PARAM_LIMIT,
    PARAM_RADIUS,
    PARAM_ZIPCODE,
];

/// Whether `key` is a query modifier rather than a field filter.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_PARAMS.contains(&key)
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page used when `page` is absent, unparseable or zero.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when `limit` is absent, unparseable or zero.
pub const DEFAULT_LIMIT: i64 = 25;

/// Pagination defaults handed to the engine by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub page: i64,
    pub limit: i64,
    /// Optional ceiling on `limit`. Without one, any positive page size is
    /// honoured as requested.
    pub max_limit: Option<i64>,
}

impl QueryDefaults {
    /// Build defaults, flooring every value at 1 and keeping
    /// `limit <= max_limit` when a ceiling is set.
    pub fn new(page: i64, limit: i64, max_limit: Option<i64>) -> Self {
        let max_limit = max_limit.map(|max| max.max(1));
        let limit = limit.max(1);
        Self {
            page: page.max(1),
            limit: max_limit.map_or(limit, |max| limit.min(max)),
            max_limit,
        }
    }
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT, None)
    }
}

// ---------------------------------------------------------------------------
// QueryParameters
// ---------------------------------------------------------------------------

/// Raw query parameters in request order.
///
/// Repeated keys are kept; lookups of a single value return the last
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct QueryParameters {
    pairs: Vec<(String, String)>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Numbers and booleans are stored in their textual
    /// form, exactly as they would arrive in a query string.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Last value supplied for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parameters that are candidate field filters (reserved keys removed).
    pub fn filter_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter(|(k, _)| !is_reserved(k))
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl From<Vec<(String, String)>> for QueryParameters {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine operations
// ---------------------------------------------------------------------------

/// Build the field filter expression, ignoring reserved parameters.
pub fn build_filter(params: &QueryParameters) -> Result<FilterExpression, CoreError> {
    FilterExpression::from_params(params)
}

/// Build the sort order from `sort`, defaulting to newest first.
pub fn build_sort(params: &QueryParameters) -> SortSpec {
    SortSpec::parse(params.get(PARAM_SORT))
}

/// Build the pagination window and its next/prev links for `total` matches.
pub fn build_pagination(
    params: &QueryParameters,
    total: i64,
    defaults: &QueryDefaults,
) -> (PaginationWindow, PaginationResult) {
    let window = PaginationWindow::from_params(params, defaults);
    let result = window.result(total);
    (window, result)
}

/// Build the response projection from `select`.
pub fn build_field_selection(params: &QueryParameters) -> Result<FieldSelection, CoreError> {
    FieldSelection::parse(params.get(PARAM_SELECT))
}

/// Everything a job listing request needs except the total count.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSearchQuery {
    pub filter: FilterExpression,
    pub sort: SortSpec,
    pub selection: FieldSelection,
    pub window: PaginationWindow,
}

impl JobSearchQuery {
    pub fn from_params(
        params: &QueryParameters,
        defaults: &QueryDefaults,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            filter: build_filter(params)?,
            sort: build_sort(params),
            selection: build_field_selection(params)?,
            window: PaginationWindow::from_params(params, defaults),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn reserved_keys_never_become_filters() {
        let params = QueryParameters::new()
            .with("select", "title")
            .with("sort", "-salary.min")
            .with("page", 2)
            .with("limit", 10)
            .with("radius", 50)
            .with("zipcode", "02118")
            .with("jobType", "Contract");

        let filter = build_filter(&params).unwrap();
        for key in RESERVED_PARAMS {
            assert!(filter.get(key).is_none(), "{key} leaked into the filter");
        }
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn last_value_wins_for_lookups() {
        let params = QueryParameters::new().with("page", 1).with("page", 4);
        assert_eq!(params.get("page"), Some("4"));
    }

    #[test]
    fn deserializes_from_urlencoded_pairs() {
        let pairs = vec![
            ("salary[gte]".to_string(), "50000".to_string()),
            ("page".to_string(), "2".to_string()),
        ];
        let params: QueryParameters = serde_json::from_value(serde_json::json!(pairs)).unwrap();
        assert_eq!(params.get("salary[gte]"), Some("50000"));
        assert_eq!(params.filter_pairs().count(), 1);
    }

    #[test]
    fn query_descriptor_combines_all_parts() {
        let params = QueryParameters::new()
            .with("isRemote", true)
            .with("sort", "title")
            .with("select", "title,company")
            .with("page", 3)
            .with("limit", 5);

        let query = JobSearchQuery::from_params(&params, &QueryDefaults::default()).unwrap();
        assert_eq!(query.filter.len(), 1);
        assert_eq!(query.sort.keys()[0].field, "title");
        assert_matches!(query.selection, FieldSelection::Include { .. });
        assert_eq!(query.window.offset(), 10);
    }

    #[test]
    fn malformed_filter_fails_the_whole_query() {
        let params = QueryParameters::new().with("salary[between]", "1,2");
        let err = JobSearchQuery::from_params(&params, &QueryDefaults::default()).unwrap_err();
        assert_matches!(err, CoreError::ContractViolation(_));
    }

    #[test]
    fn defaults_are_floored_and_capped() {
        let defaults = QueryDefaults::new(0, 500, Some(100));
        assert_eq!(defaults, QueryDefaults { page: 1, limit: 100, max_limit: Some(100) });
    }

    #[test]
    fn defaults_have_no_ceiling() {
        let defaults = QueryDefaults::default();
        assert_eq!(defaults, QueryDefaults { page: 1, limit: 25, max_limit: None });
        assert_eq!(QueryDefaults::new(-2, 0, None).limit, 1);
    }

    #[test]
    fn large_limit_is_honoured_without_a_ceiling() {
        let params = QueryParameters::new().with("page", 1).with("limit", 200);
        let (window, result) = build_pagination(&params, 150, &QueryDefaults::default());
        assert_eq!(window, PaginationWindow { page: 1, limit: 200 });
        assert_eq!(result.next, None);
        assert_eq!(result.prev, None);
    }
}
