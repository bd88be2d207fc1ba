//! SQL translation of job search descriptors.
//!
//! Filter fields are looked up in a fixed whitelist mapping API names to
//! `jobs` columns (aliased `j`). A field outside the whitelist names no
//! stored attribute, so it compiles to `FALSE` and matches nothing. Values
//! are parsed into the column's Rust type here, so a bad value is rejected
//! before any SQL runs, and bound as numbered parameters; no request text is
//! ever spliced into the SQL.

use chrono::{DateTime, NaiveDate, Utc};
use jobboard_core::error::CoreError;
use jobboard_core::job_query::{
    Comparison, FieldPredicate, FilterExpression, JobSearchQuery, RadiusQuery, SortDirection,
    SortSpec,
};
use jobboard_core::types::Timestamp;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{QueryAs, QueryScalar};

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    BigInt(i64),
    BigIntArray(Vec<i64>),
    Float(f64),
    FloatArray(Vec<f64>),
    Bool(bool),
    Timestamp(Timestamp),
    TimestampArray(Vec<Timestamp>),
}

// ---------------------------------------------------------------------------
// Field whitelist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Id,
    Text,
    Float,
    Bool,
    Timestamp,
    /// `TEXT[]`: equality is membership, `in` is overlap.
    TextArray,
    /// Generated `tsvector`: equality is a full-text match.
    FullText,
}

#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    name: &'static str,
    column: &'static str,
    kind: FieldKind,
}

const fn field(name: &'static str, column: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, column, kind }
}

const FIELDS: &[FieldSpec] = &[
    field("_id", "j.id", FieldKind::Id),
    field("title", "j.title", FieldKind::Text),
    field("description", "j.description", FieldKind::Text),
    field("jobType", "j.job_type", FieldKind::Text),
    field("experienceLevel", "j.experience_level", FieldKind::Text),
    field("industry", "j.industry", FieldKind::Text),
    field("company", "j.company_id", FieldKind::Id),
    field("postedBy", "j.posted_by", FieldKind::Id),
    field("isActive", "j.is_active", FieldKind::Bool),
    field("isRemote", "j.location_is_remote", FieldKind::Bool),
    field("visaSponsorship", "j.visa_sponsorship", FieldKind::Bool),
    field("relocationAssistance", "j.relocation_assistance", FieldKind::Bool),
    field("salary.min", "j.salary_min", FieldKind::Float),
    field("salary.max", "j.salary_max", FieldKind::Float),
    field("salary.currency", "j.salary_currency", FieldKind::Text),
    field("salary.isPublic", "j.salary_is_public", FieldKind::Bool),
    field("location.city", "j.location_city", FieldKind::Text),
    field("location.state", "j.location_state", FieldKind::Text),
    field("location.zipCode", "j.location_zip_code", FieldKind::Text),
    field("location.country", "j.location_country", FieldKind::Text),
    field("location.isRemote", "j.location_is_remote", FieldKind::Bool),
    field("skills", "j.skills", FieldKind::TextArray),
    field("expiresAt", "j.expires_at", FieldKind::Timestamp),
    field("createdAt", "j.created_at", FieldKind::Timestamp),
    field("updatedAt", "j.updated_at", FieldKind::Timestamp),
    field("search", "j.search_vector", FieldKind::FullText),
];

fn lookup(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// API names accepted as filter fields.
pub fn filterable_fields() -> impl Iterator<Item = &'static str> {
    FIELDS.iter().map(|f| f.name)
}

// ---------------------------------------------------------------------------
// Search plan
// ---------------------------------------------------------------------------

/// Compiled WHERE / ORDER BY clauses for a job listing.
///
/// `binds` fill `$1..$n` in `where_sql`; the page query appends the limit
/// and offset as `$n+1` and `$n+2`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub where_sql: String,
    pub order_by: String,
    pub binds: Vec<BindValue>,
    pub limit: i64,
    pub offset: i64,
}

impl SearchPlan {
    pub fn compile(query: &JobSearchQuery) -> Result<Self, CoreError> {
        let mut binds = Vec::new();
        let where_sql = compile_filter(&query.filter, &mut binds)?;
        let order_by = compile_sort(&query.sort)?;
        Ok(Self {
            where_sql,
            order_by,
            binds,
            limit: query.window.limit,
            offset: query.window.offset(),
        })
    }

    /// Placeholders for the page query's `LIMIT` and `OFFSET`.
    pub fn page_placeholders(&self) -> (usize, usize) {
        let n = self.binds.len();
        (n + 1, n + 2)
    }
}

/// AND of every field predicate, or `TRUE` for an empty filter.
pub fn compile_filter(
    filter: &FilterExpression,
    binds: &mut Vec<BindValue>,
) -> Result<String, CoreError> {
    let mut conditions = Vec::new();
    for (name, predicate) in filter.iter() {
        let Some(spec) = lookup(name) else {
            tracing::debug!(field = name, "Filter on unknown field matches nothing");
            conditions.push("FALSE".to_string());
            continue;
        };
        match predicate {
            FieldPredicate::Equals(value) => conditions.push(equals(spec, value, binds)?),
            FieldPredicate::Compare(comparisons) => {
                for comparison in comparisons {
                    conditions.push(compare(spec, comparison, binds)?);
                }
            }
        }
    }

    Ok(if conditions.is_empty() {
        "TRUE".to_string()
    } else {
        conditions.join(" AND ")
    })
}

/// ORDER BY list, with `j.id` appended as a final tie-breaker so pages are
/// stable.
pub fn compile_sort(sort: &SortSpec) -> Result<String, CoreError> {
    let mut terms = Vec::with_capacity(sort.keys().len() + 1);
    let mut has_id = false;
    for key in sort.keys() {
        let spec = lookup(&key.field)
            .filter(|f| !matches!(f.kind, FieldKind::TextArray | FieldKind::FullText))
            .ok_or_else(|| CoreError::contract(format!("Cannot sort by '{}'", key.field)))?;
        has_id |= spec.name == "_id";
        let direction = match key.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        terms.push(format!("{} {direction}", spec.column));
    }
    if !has_id {
        terms.push("j.id ASC".to_string());
    }
    Ok(terms.join(", "))
}

/// Great-circle containment test against `j.location_lng` / `j.location_lat`,
/// the SQL twin of [`RadiusQuery::contains`]. Jobs without a position never
/// match.
pub fn radius_predicate(radius: &RadiusQuery, binds: &mut Vec<BindValue>) -> String {
    let lng = push(binds, BindValue::Float(radius.longitude));
    let lat = push(binds, BindValue::Float(radius.latitude));
    let max = push(binds, BindValue::Float(radius.radius_radians));
    format!(
        "j.location_lng IS NOT NULL AND j.location_lat IS NOT NULL AND \
         2 * ASIN(SQRT(LEAST(1.0, \
             POWER(SIN(RADIANS(j.location_lat - ${lat}) / 2), 2) + \
             COS(RADIANS(${lat})) * COS(RADIANS(j.location_lat)) * \
             POWER(SIN(RADIANS(j.location_lng - ${lng}) / 2), 2)))) <= ${max}"
    )
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Bind `values` in order onto a `query_as` query.
pub fn bind_query_as<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &[BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value.clone() {
            BindValue::Text(v) => query.bind(v),
            BindValue::TextArray(v) => query.bind(v),
            BindValue::BigInt(v) => query.bind(v),
            BindValue::BigIntArray(v) => query.bind(v),
            BindValue::Float(v) => query.bind(v),
            BindValue::FloatArray(v) => query.bind(v),
            BindValue::Bool(v) => query.bind(v),
            BindValue::Timestamp(v) => query.bind(v),
            BindValue::TimestampArray(v) => query.bind(v),
        };
    }
    query
}

/// Bind `values` in order onto a `query_scalar` query.
pub fn bind_query_scalar<'q, O>(
    mut query: QueryScalar<'q, Postgres, O, PgArguments>,
    values: &[BindValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value.clone() {
            BindValue::Text(v) => query.bind(v),
            BindValue::TextArray(v) => query.bind(v),
            BindValue::BigInt(v) => query.bind(v),
            BindValue::BigIntArray(v) => query.bind(v),
            BindValue::Float(v) => query.bind(v),
            BindValue::FloatArray(v) => query.bind(v),
            BindValue::Bool(v) => query.bind(v),
            BindValue::Timestamp(v) => query.bind(v),
            BindValue::TimestampArray(v) => query.bind(v),
        };
    }
    query
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn push(binds: &mut Vec<BindValue>, value: BindValue) -> usize {
    binds.push(value);
    binds.len()
}

fn equals(spec: &FieldSpec, raw: &str, binds: &mut Vec<BindValue>) -> Result<String, CoreError> {
    let column = spec.column;
    Ok(match spec.kind {
        FieldKind::TextArray => {
            let n = push(binds, BindValue::Text(raw.to_string()));
            format!("${n} = ANY({column})")
        }
        FieldKind::FullText => {
            let n = push(binds, BindValue::Text(raw.to_string()));
            format!("{column} @@ plainto_tsquery('english', ${n})")
        }
        _ => {
            let n = push(binds, scalar(spec, raw)?);
            format!("{column} = ${n}")
        }
    })
}

fn compare(
    spec: &FieldSpec,
    comparison: &Comparison,
    binds: &mut Vec<BindValue>,
) -> Result<String, CoreError> {
    let column = spec.column;
    match (spec.kind, comparison) {
        (FieldKind::Bool | FieldKind::FullText, _) => Err(CoreError::contract(format!(
            "Field '{}' does not support the '{}' operator",
            spec.name,
            comparison.op()
        ))),
        (FieldKind::TextArray, Comparison::In(values)) => {
            let n = push(binds, BindValue::TextArray(values.clone()));
            Ok(format!("{column} && ${n}"))
        }
        (FieldKind::TextArray, other) => Err(CoreError::contract(format!(
            "Field '{}' does not support the '{}' operator",
            spec.name,
            other.op()
        ))),
        (_, Comparison::In(values)) => {
            let n = push(binds, scalar_list(spec, values)?);
            Ok(format!("{column} = ANY(${n})"))
        }
        (_, Comparison::Gt(v)) => range(spec, ">", v, binds),
        (_, Comparison::Gte(v)) => range(spec, ">=", v, binds),
        (_, Comparison::Lt(v)) => range(spec, "<", v, binds),
        (_, Comparison::Lte(v)) => range(spec, "<=", v, binds),
    }
}

fn range(
    spec: &FieldSpec,
    sql_op: &str,
    raw: &str,
    binds: &mut Vec<BindValue>,
) -> Result<String, CoreError> {
    let n = push(binds, scalar(spec, raw)?);
    Ok(format!("{} {sql_op} ${n}", spec.column))
}

// ---------------------------------------------------------------------------
// Value casts
// ---------------------------------------------------------------------------

fn scalar(spec: &FieldSpec, raw: &str) -> Result<BindValue, CoreError> {
    Ok(match spec.kind {
        FieldKind::Id => BindValue::BigInt(parse_id(spec, raw)?),
        FieldKind::Float => BindValue::Float(parse_float(spec, raw)?),
        FieldKind::Bool => BindValue::Bool(parse_bool(spec, raw)?),
        FieldKind::Timestamp => BindValue::Timestamp(parse_timestamp(spec, raw)?),
        FieldKind::Text | FieldKind::TextArray | FieldKind::FullText => {
            BindValue::Text(raw.to_string())
        }
    })
}

fn scalar_list(spec: &FieldSpec, values: &[String]) -> Result<BindValue, CoreError> {
    Ok(match spec.kind {
        FieldKind::Id => BindValue::BigIntArray(
            values.iter().map(|v| parse_id(spec, v)).collect::<Result<_, _>>()?,
        ),
        FieldKind::Float => BindValue::FloatArray(
            values.iter().map(|v| parse_float(spec, v)).collect::<Result<_, _>>()?,
        ),
        FieldKind::Timestamp => BindValue::TimestampArray(
            values.iter().map(|v| parse_timestamp(spec, v)).collect::<Result<_, _>>()?,
        ),
        _ => BindValue::TextArray(values.to_vec()),
    })
}

fn uncastable(spec: &FieldSpec, raw: &str, expected: &str) -> CoreError {
    CoreError::contract(format!(
        "Invalid value '{raw}' for field '{}': expected {expected}",
        spec.name
    ))
}

fn parse_id(spec: &FieldSpec, raw: &str) -> Result<i64, CoreError> {
    raw.trim()
        .parse()
        .map_err(|_| uncastable(spec, raw, "an integer id"))
}

fn parse_float(spec: &FieldSpec, raw: &str) -> Result<f64, CoreError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| uncastable(spec, raw, "a number"))
}

fn parse_bool(spec: &FieldSpec, raw: &str) -> Result<bool, CoreError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(uncastable(spec, raw, "true or false")),
    }
}

/// RFC 3339 timestamps, or a bare `YYYY-MM-DD` date taken as UTC midnight.
fn parse_timestamp(spec: &FieldSpec, raw: &str) -> Result<Timestamp, CoreError> {
    let raw_trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw_trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw_trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| uncastable(spec, raw, "an RFC 3339 timestamp or YYYY-MM-DD date"))
}
