//! Page/limit windows and next/prev links.

use serde::Serialize;

use super::{QueryDefaults, QueryParameters, PARAM_LIMIT, PARAM_PAGE};

/// The slice of matching rows a request returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    pub page: i64,
    pub limit: i64,
}

impl PaginationWindow {
    /// Resolve `page` and `limit` from the request.
    ///
    /// Values are read like a lenient integer parse (`"3abc"` is 3, `"2.9"`
    /// is 2). Absent, unparseable or zero values take the default; negative
    /// values are clamped to 1. `limit` is held to `defaults.max_limit` only
    /// when a ceiling is configured.
    pub fn from_params(params: &QueryParameters, defaults: &QueryDefaults) -> Self {
        let page = resolve(params.get(PARAM_PAGE), defaults.page);
        let limit = resolve(params.get(PARAM_LIMIT), defaults.limit);
        let limit = defaults.max_limit.map_or(limit, |max| limit.min(max));
        Self { page, limit }
    }

    /// Rows to skip: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Links for the neighbouring pages given `total` matching rows.
    pub fn result(&self, total: i64) -> PaginationResult {
        let offset = self.offset();
        let next = (offset.saturating_add(self.limit) < total).then(|| PageRef {
            page: self.page.saturating_add(1),
            limit: self.limit,
        });
        let prev = (offset > 0).then(|| PageRef {
            page: self.page - 1,
            limit: self.limit,
        });
        PaginationResult { next, prev }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

/// Serialized as `{}` when there is neither a next nor a previous page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaginationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

fn resolve(raw: Option<&str>, default: i64) -> i64 {
    match raw.and_then(parse_leading_int) {
        None | Some(0) => default,
        Some(n) if n < 0 => 1,
        Some(n) => n,
    }
}

/// Parse the leading integer of `raw`: optional whitespace, optional sign,
/// then digits up to the first non-digit. Overlong numbers saturate.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>, limit: Option<&str>) -> QueryParameters {
        let mut params = QueryParameters::new();
        if let Some(page) = page {
            params.push("page", page);
        }
        if let Some(limit) = limit {
            params.push("limit", limit);
        }
        params
    }

    fn window(page: Option<&str>, limit: Option<&str>) -> PaginationWindow {
        PaginationWindow::from_params(&params(page, limit), &QueryDefaults::default())
    }

    #[test]
    fn defaults_to_first_page_of_twenty_five() {
        let w = window(None, None);
        assert_eq!(w, PaginationWindow { page: 1, limit: 25 });
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn middle_page_has_both_links() {
        let w = window(Some("2"), Some("10"));
        assert_eq!(w.offset(), 10);
        let result = w.result(30);
        assert_eq!(result.next, Some(PageRef { page: 3, limit: 10 }));
        assert_eq!(result.prev, Some(PageRef { page: 1, limit: 10 }));
    }

    #[test]
    fn single_short_page_has_no_links() {
        let result = window(Some("1"), Some("25")).result(5);
        assert_eq!(result, PaginationResult::default());
        assert_eq!(serde_json::to_value(result).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn last_exact_page_has_no_next() {
        let result = window(Some("3"), Some("10")).result(30);
        assert_eq!(result.next, None);
        assert_eq!(result.prev, Some(PageRef { page: 2, limit: 10 }));
    }

    #[test]
    fn result_is_stable_for_the_same_total() {
        let w = window(Some("4"), Some("7"));
        assert_eq!(w.result(100), w.result(100));
        assert_eq!(window(Some("4"), Some("7")), w);
    }

    #[test]
    fn lenient_integer_parsing() {
        assert_eq!(window(Some("3abc"), Some("2.9")), PaginationWindow { page: 3, limit: 2 });
        assert_eq!(window(Some(" 5"), None).page, 5);
        assert_eq!(window(Some("+2"), None).page, 2);
    }

    #[test]
    fn unparseable_and_zero_use_defaults() {
        assert_eq!(window(Some("abc"), Some("0")), PaginationWindow { page: 1, limit: 25 });
        assert_eq!(window(Some("0"), Some("")), PaginationWindow { page: 1, limit: 25 });
    }

    #[test]
    fn negatives_are_clamped_to_one() {
        let w = window(Some("-3"), Some("-10"));
        assert_eq!(w, PaginationWindow { page: 1, limit: 1 });
        assert_eq!(w.offset(), 0);
    }

    #[test]
    fn limit_is_uncapped_by_default() {
        let w = window(Some("1"), Some("200"));
        assert_eq!(w.limit, 200);
        assert_eq!(w.result(150), PaginationResult::default());
    }

    #[test]
    fn configured_ceiling_caps_limit() {
        let defaults = QueryDefaults::new(1, 25, Some(100));
        let w = PaginationWindow::from_params(&params(None, Some("1000")), &defaults);
        assert_eq!(w.limit, 100);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let w = window(Some("99999999999999999999999"), Some("50"));
        assert_eq!(w.page, i64::MAX);
        assert_eq!(w.offset(), i64::MAX);
        assert_eq!(w.result(10).next, None);
    }
}
