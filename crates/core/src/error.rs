/// Domain-level error taxonomy shared by the storage and HTTP layers.
///
/// Every variant maps to exactly one HTTP status in the API crate; the
/// `Display` output is the client-facing message.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The `id` is kept as the caller supplied it so the message echoes
    /// the literal value, even when it is not a well-formed id.
    #[error("{entity} not found with id of {id}")]
    NotFound { entity: &'static str, id: String },

    /// A request body names a related record that does not exist, e.g. the
    /// company a new job is posted under. `entity` is lower-case.
    #[error("No {entity} with the id of {id}")]
    ReferenceNotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    /// Malformed search input (bad operator, unknown field, uncastable value).
    #[error("{0}")]
    ContractViolation(String),

    #[error("No location found for '{0}'")]
    GeocodeNotFound(String),

    /// The geocoding service itself failed (as opposed to finding nothing).
    #[error(transparent)]
    Geocoding(#[from] crate::geocoding::GeocodeError),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by any displayable id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`CoreError::ReferenceNotFound`].
    pub fn reference_not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::ReferenceNotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a [`CoreError::ContractViolation`].
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }
}
