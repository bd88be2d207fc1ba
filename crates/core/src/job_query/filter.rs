//! Field filters parsed from REST-style query keys.
//!
//! `jobType=Contract` is an exact match; `salary.min[gte]=50000` is a
//! comparison. Operators are recognised only as the complete bracketed
//! token, so `salary[gtx]` is rejected rather than read as `gt`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use super::QueryParameters;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComparisonOp {
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 5] = [Self::Gt, Self::Gte, Self::Lt, Self::Lte, Self::In];

    /// Parse a whole operator token.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::In => "in",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// One comparison against a field. Values stay textual; the storage layer
/// casts them to the column type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Gt(String),
    Gte(String),
    Lt(String),
    Lte(String),
    In(Vec<String>),
}

impl Comparison {
    pub fn op(&self) -> ComparisonOp {
        match self {
            Self::Gt(_) => ComparisonOp::Gt,
            Self::Gte(_) => ComparisonOp::Gte,
            Self::Lt(_) => ComparisonOp::Lt,
            Self::Lte(_) => ComparisonOp::Lte,
            Self::In(_) => ComparisonOp::In,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Gt(v) | Self::Gte(v) | Self::Lt(v) | Self::Lte(v) => Value::String(v.clone()),
            Self::In(values) => Value::Array(values.iter().cloned().map(Value::String).collect()),
        }
    }
}

/// What a single field must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPredicate {
    Equals(String),
    /// Conjunction of comparisons, at most one per operator.
    Compare(Vec<Comparison>),
}

// ---------------------------------------------------------------------------
// FilterExpression
// ---------------------------------------------------------------------------

/// Field name to predicate, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterExpression {
    fields: BTreeMap<String, FieldPredicate>,
}

impl FilterExpression {
    /// Parse every non-reserved parameter into a field predicate.
    pub fn from_params(params: &QueryParameters) -> Result<Self, CoreError> {
        let mut expr = Self::default();
        for (key, value) in params.filter_pairs() {
            let (field, op) = parse_key(key)?;
            match op {
                None => expr.add_equals(field, value)?,
                Some(op) => expr.add_comparison(field, op, value)?,
            }
        }
        Ok(expr)
    }

    pub fn get(&self, field: &str) -> Option<&FieldPredicate> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldPredicate)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Document-store rendering (`{"salary.min": {"$gte": "50000"}}`), used
    /// for logging.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (field, predicate) in &self.fields {
            let rendered = match predicate {
                FieldPredicate::Equals(v) => Value::String(v.clone()),
                FieldPredicate::Compare(comparisons) => Value::Object(
                    comparisons
                        .iter()
                        .map(|c| (format!("${}", c.op()), c.to_json()))
                        .collect(),
                ),
            };
            out.insert(field.clone(), rendered);
        }
        Value::Object(out)
    }

    fn add_equals(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        match self.fields.get_mut(field) {
            Some(FieldPredicate::Compare(_)) => Err(mixed_predicate(field)),
            // Repeated plain keys: the last one wins.
            Some(FieldPredicate::Equals(existing)) => {
                *existing = value.to_string();
                Ok(())
            }
            None => {
                self.fields
                    .insert(field.to_string(), FieldPredicate::Equals(value.to_string()));
                Ok(())
            }
        }
    }

    fn add_comparison(
        &mut self,
        field: &str,
        op: ComparisonOp,
        value: &str,
    ) -> Result<(), CoreError> {
        let comparisons = match self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| FieldPredicate::Compare(Vec::new()))
        {
            FieldPredicate::Equals(_) => return Err(mixed_predicate(field)),
            FieldPredicate::Compare(comparisons) => comparisons,
        };

        let comparison = match op {
            ComparisonOp::Gt => Comparison::Gt(value.to_string()),
            ComparisonOp::Gte => Comparison::Gte(value.to_string()),
            ComparisonOp::Lt => Comparison::Lt(value.to_string()),
            ComparisonOp::Lte => Comparison::Lte(value.to_string()),
            ComparisonOp::In => {
                let values = split_list(value);
                if values.is_empty() {
                    return Err(CoreError::contract(format!(
                        "Operator 'in' on field '{field}' requires at least one value"
                    )));
                }
                // Repeated `in` parameters accumulate.
                if let Some(Comparison::In(existing)) =
                    comparisons.iter_mut().find(|c| c.op() == ComparisonOp::In)
                {
                    existing.extend(values);
                    return Ok(());
                }
                Comparison::In(values)
            }
        };
        match comparisons.iter_mut().find(|c| c.op() == op) {
            Some(existing) => *existing = comparison,
            None => comparisons.push(comparison),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Key parsing
// ---------------------------------------------------------------------------

/// Split `field[op]` into its field name and operator.
fn parse_key(key: &str) -> Result<(&str, Option<ComparisonOp>), CoreError> {
    if key.starts_with('$') {
        return Err(CoreError::contract(format!(
            "Query key '{key}' is not allowed; write comparisons as field[op]=value"
        )));
    }

    let Some(open) = key.find('[') else {
        if key.contains(']') {
            return Err(malformed_key(key));
        }
        if let Some(op) = ComparisonOp::parse(key) {
            return Err(CoreError::contract(format!(
                "Comparison operator '{op}' must be attached to a field, \
                 e.g. salary.min[{op}]=value"
            )));
        }
        if key.is_empty() {
            return Err(CoreError::contract("Query keys must not be empty"));
        }
        return Ok((key, None));
    };

    let field = &key[..open];
    let inner = key[open + 1..]
        .strip_suffix(']')
        .filter(|inner| !inner.contains(['[', ']']))
        .ok_or_else(|| malformed_key(key))?;

    if field.is_empty() {
        return Err(CoreError::contract(format!(
            "Query key '{key}' is missing a field name"
        )));
    }

    let op = ComparisonOp::parse(inner).ok_or_else(|| {
        CoreError::contract(format!(
            "Unsupported comparison operator '{inner}' on field '{field}'; \
             expected one of gt, gte, lt, lte, in"
        ))
    })?;

    Ok((field, Some(op)))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn malformed_key(key: &str) -> CoreError {
    CoreError::contract(format!(
        "Malformed query key '{key}'; expected field or field[op]"
    ))
}

fn mixed_predicate(field: &str) -> CoreError {
    CoreError::contract(format!(
        "Field '{field}' mixes an exact match with comparison operators"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn filter(pairs: &[(&str, &str)]) -> Result<FilterExpression, CoreError> {
        let params: QueryParameters = pairs.iter().copied().collect();
        FilterExpression::from_params(&params)
    }

    #[test]
    fn plain_key_is_exact_match() {
        let expr = filter(&[("jobType", "Full-time")]).unwrap();
        assert_eq!(
            expr.get("jobType"),
            Some(&FieldPredicate::Equals("Full-time".into()))
        );
    }

    #[test]
    fn bracket_operator_becomes_comparison() {
        let expr = filter(&[("salary.min[gte]", "50000")]).unwrap();
        assert_eq!(
            expr.get("salary.min"),
            Some(&FieldPredicate::Compare(vec![Comparison::Gte("50000".into())]))
        );
    }

    #[test]
    fn every_operator_is_recognised() {
        for op in ComparisonOp::ALL {
            let key = format!("salary.max[{op}]");
            let expr = filter(&[(key.as_str(), "10")]).unwrap();
            let Some(FieldPredicate::Compare(cmps)) = expr.get("salary.max") else {
                panic!("{op} was not parsed as a comparison");
            };
            assert_eq!(cmps[0].op(), op);
        }
    }

    #[test]
    fn operators_match_whole_tokens_only() {
        for key in ["salary[gtx]", "salary[ingest]", "salary[GT]", "salary[]"] {
            let err = filter(&[(key, "1")]).unwrap_err();
            assert_matches!(err, CoreError::ContractViolation(_), "{key}");
        }
    }

    #[test]
    fn operator_words_in_values_are_left_alone() {
        let expr = filter(&[("title", "in"), ("industry", "gt lt")]).unwrap();
        assert_eq!(expr.get("title"), Some(&FieldPredicate::Equals("in".into())));
        assert_eq!(
            expr.get("industry"),
            Some(&FieldPredicate::Equals("gt lt".into()))
        );
    }

    #[test]
    fn field_names_containing_operator_words_are_plain_fields() {
        let expr = filter(&[("internship", "yes"), ("ltd", "no")]).unwrap();
        assert_eq!(expr.len(), 2);
    }

    #[test]
    fn range_on_one_field_combines() {
        let expr = filter(&[("salary.min[gte]", "100"), ("salary.min[lt]", "200")]).unwrap();
        assert_eq!(
            expr.get("salary.min"),
            Some(&FieldPredicate::Compare(vec![
                Comparison::Gte("100".into()),
                Comparison::Lt("200".into()),
            ]))
        );
    }

    #[test]
    fn in_splits_commas_and_accumulates() {
        let expr = filter(&[
            ("jobType[in]", "Contract, Temporary"),
            ("jobType[in]", "Internship"),
        ])
        .unwrap();
        assert_eq!(
            expr.get("jobType"),
            Some(&FieldPredicate::Compare(vec![Comparison::In(vec![
                "Contract".into(),
                "Temporary".into(),
                "Internship".into(),
            ])]))
        );
    }

    #[test]
    fn empty_in_list_is_rejected() {
        let err = filter(&[("jobType[in]", " , ")]).unwrap_err();
        assert_matches!(err, CoreError::ContractViolation(msg) if msg.contains("jobType"));
    }

    #[test]
    fn repeated_plain_key_keeps_last_value() {
        let expr = filter(&[("jobType", "Contract"), ("jobType", "Remote")]).unwrap();
        assert_eq!(expr.get("jobType"), Some(&FieldPredicate::Equals("Remote".into())));
    }

    #[test]
    fn mixing_equality_and_comparison_is_rejected() {
        let err = filter(&[("salary.min", "5"), ("salary.min[gt]", "1")]).unwrap_err();
        assert_matches!(err, CoreError::ContractViolation(_));

        let err = filter(&[("salary.min[gt]", "1"), ("salary.min", "5")]).unwrap_err();
        assert_matches!(err, CoreError::ContractViolation(_));
    }

    #[test]
    fn malformed_keys_fail_fast() {
        let keys = [
            "salary[gte",
            "salary]gte[",
            "salary[gte]]",
            "salary[[gte]]",
            "[gte]",
            "$where",
            "gt",
            "",
        ];
        for key in keys {
            let err = filter(&[(key, "1")]).unwrap_err();
            assert_matches!(err, CoreError::ContractViolation(_), "{key:?}");
        }
    }

    #[test]
    fn renders_document_store_operators() {
        let expr = filter(&[("salary.min[gte]", "50000"), ("jobType[in]", "Contract")]).unwrap();
        assert_eq!(
            expr.to_json(),
            serde_json::json!({
                "jobType": {"$in": ["Contract"]},
                "salary.min": {"$gte": "50000"},
            })
        );
    }
}
