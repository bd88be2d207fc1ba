//! Geocoding collaborator boundary.
//!
//! The API crate provides the HTTP-backed implementation; everything in
//! this crate only depends on the [`Geocoder`] trait.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One candidate returned by a geocoding lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: Option<String>,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub zipcode: Option<String>,
    pub country_code: Option<String>,
}

impl GeoLocation {
    /// A bare coordinate pair with no address details.
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            formatted_address: None,
            city: None,
            state_code: None,
            zipcode: None,
            country_code: None,
        }
    }
}

/// Failure talking to the geocoding service. An empty result set is not an
/// error at this level; callers decide what "no candidates" means.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("Geocoding request failed: {0}")]
    Transport(String),

    #[error("Geocoding service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed geocoding response: {0}")]
    Malformed(String),
}

/// Resolves free-form addresses or postal codes to coordinates.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Return candidate locations for `query`, best match first.
    async fn geocode(&self, query: &str) -> Result<Vec<GeoLocation>, GeocodeError>;
}

/// Geocode `query` and keep the first candidate.
///
/// Returns [`CoreError::GeocodeNotFound`] when the service answers with no
/// candidates, and [`CoreError::Geocoding`] when the service call fails.
pub async fn resolve_first<G>(geocoder: &G, query: &str) -> Result<GeoLocation, CoreError>
where
    G: Geocoder + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(CoreError::Validation(
            "A location is required for geocoding".into(),
        ));
    }

    geocoder
        .geocode(query)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::GeocodeNotFound(query.to_string()))
}
