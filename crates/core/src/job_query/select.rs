//! Response projection from the `select` parameter.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::CoreError;

/// Identifier key kept by inclusion projections unless excluded explicitly.
const ID_FIELD: &str = "_id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    All,
    /// Only these (possibly dotted) paths, plus `_id` when `keep_id`.
    Include {
        fields: BTreeSet<String>,
        keep_id: bool,
    },
    /// Everything except these paths.
    Exclude(BTreeSet<String>),
}

impl FieldSelection {
    /// Parse `title,company` (inclusion) or `-description` (exclusion).
    ///
    /// Inclusion and exclusion cannot be mixed, except that `-_id` may
    /// accompany an inclusion list to drop the identifier.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let Some(raw) = raw else {
            return Ok(Self::All);
        };

        let mut include = BTreeSet::new();
        let mut exclude = BTreeSet::new();
        for token in raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
        {
            match token.strip_prefix('-') {
                Some("") => {}
                Some(field) => {
                    exclude.insert(field.to_string());
                }
                None => {
                    include.insert(token.to_string());
                }
            }
        }

        if include.is_empty() {
            return Ok(if exclude.is_empty() {
                Self::All
            } else {
                Self::Exclude(exclude)
            });
        }

        let keep_id = !exclude.remove(ID_FIELD);
        if !exclude.is_empty() {
            return Err(CoreError::contract(
                "Cannot mix included and excluded fields in 'select'",
            ));
        }
        Ok(Self::Include {
            fields: include,
            keep_id,
        })
    }

    /// Apply the projection to a serialized document. Non-object documents
    /// and unknown paths pass through untouched.
    pub fn apply(&self, document: Value) -> Value {
        match (self, document) {
            (Self::All, doc) => doc,
            (Self::Include { fields, keep_id }, Value::Object(source)) => {
                let mut projected = Map::new();
                if *keep_id {
                    if let Some(id) = source.get(ID_FIELD) {
                        projected.insert(ID_FIELD.to_string(), id.clone());
                    }
                }
                for path in fields {
                    copy_path(&source, &mut projected, path);
                }
                Value::Object(projected)
            }
            (Self::Exclude(fields), Value::Object(mut source)) => {
                for path in fields {
                    remove_path(&mut source, path);
                }
                Value::Object(source)
            }
            (_, doc) => doc,
        }
    }
}

fn copy_path(source: &Map<String, Value>, target: &mut Map<String, Value>, path: &str) {
    match path.split_once('.') {
        None => {
            if let Some(value) = source.get(path) {
                target.insert(path.to_string(), value.clone());
            }
        }
        Some((head, rest)) => {
            let Some(Value::Object(child_source)) = source.get(head) else {
                return;
            };
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child_target) = entry {
                copy_path(child_source, child_target, rest);
            }
        }
    }
}

fn remove_path(source: &mut Map<String, Value>, path: &str) {
    match path.split_once('.') {
        None => {
            source.remove(path);
        }
        Some((head, rest)) => {
            if let Some(Value::Object(child)) = source.get_mut(head) {
                remove_path(child, rest);
            }
        }
    }
}
