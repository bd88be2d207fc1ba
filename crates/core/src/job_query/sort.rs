//! Multi-field sort order from the `sort` parameter.

use serde::Serialize;

/// Field used when the caller does not ask for an order.
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

/// Sort keys in priority order; later keys only break ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Parse `title,-salary.min` style input.
    ///
    /// Tokens are separated by commas or whitespace; a leading `-` sorts
    /// descending. A field named twice keeps its first position and takes
    /// the last direction given. Input with no usable tokens falls back to
    /// [`SortSpec::default`].
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let mut keys: Vec<SortKey> = Vec::new();
        for token in raw.split(|c: char| c == ',' || c.is_whitespace()) {
            let (field, direction) = match token.strip_prefix('-') {
                Some(field) => (field, SortDirection::Descending),
                None => (token, SortDirection::Ascending),
            };
            if field.is_empty() {
                continue;
            }
            match keys.iter_mut().find(|k| k.field == field) {
                Some(existing) => existing.direction = direction,
                None => keys.push(SortKey {
                    field: field.to_string(),
                    direction,
                }),
            }
        }

        if keys.is_empty() {
            Self::default()
        } else {
            Self { keys }
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        Self {
            keys: vec![SortKey {
                field: DEFAULT_SORT_FIELD.to_string(),
                direction: SortDirection::Descending,
            }],
        }
    }
}
