//! HTTP geocoder backed by a Nominatim-compatible search endpoint.
//!
//! Calls `GET {base_url}/search?q=<query>&format=jsonv2&addressdetails=1`
//! and maps each returned place to a [`GeoLocation`]. No retries; a failed
//! call surfaces as a [`GeocodeError`].

use std::time::Duration;

use jobboard_core::geocoding::{GeoLocation, GeocodeError, Geocoder};
use serde::Deserialize;

/// Default public Nominatim instance.
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Nominatim's usage policy requires an identifying User-Agent.
const USER_AGENT: &str = concat!("jobboard-api/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Load geocoder configuration from environment variables.
    ///
    /// | Env Var                 | Default                               |
    /// |-------------------------|---------------------------------------|
    /// | `GEOCODER_URL`          | `https://nominatim.openstreetmap.org` |
    /// | `GEOCODER_TIMEOUT_SECS` | `10`                                  |
    pub fn from_env() -> Self {
        let base_url = std::env::var("GEOCODER_URL")
            .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("GEOCODER_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GEOCODER_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

/// One entry of a `format=jsonv2` search response. Coordinates arrive as
/// decimal strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
    #[serde(default)]
    address: NominatimAddress,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    /// e.g. `US-CA`.
    #[serde(rename = "ISO3166-2-lvl4")]
    iso_state: Option<String>,
    postcode: Option<String>,
    country_code: Option<String>,
}

impl NominatimPlace {
    fn into_location(self) -> Result<GeoLocation, GeocodeError> {
        let latitude = parse_coordinate(&self.lat)?;
        let longitude = parse_coordinate(&self.lon)?;
        let address = self.address;

        let state_code = address
            .iso_state
            .as_deref()
            .and_then(|code| code.split_once('-'))
            .map(|(_, state)| state.to_string())
            .or(address.state);

        Ok(GeoLocation {
            latitude,
            longitude,
            formatted_address: self.display_name,
            city: address.city.or(address.town).or(address.village),
            state_code,
            zipcode: address.postcode,
            country_code: address.country_code.map(|c| c.to_ascii_uppercase()),
        })
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| GeocodeError::Malformed(format!("invalid coordinate '{raw}'")))
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    /// Build a geocoder with a pre-configured HTTP client.
    pub fn new(config: &GeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeoLocation>, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("format", "jsonv2"), ("addressdetails", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::HttpStatus(status.as_u16()));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::Malformed(e.to_string()))?;

        tracing::debug!(query, candidates = places.len(), "Geocoded");
        places.into_iter().map(NominatimPlace::into_location).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn places(body: &str) -> Vec<NominatimPlace> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn maps_address_details() {
        let body = r#"[{
            "lat": "34.0901", "lon": "-118.4065",
            "display_name": "Beverly Hills, Los Angeles County, California, 90210, United States",
            "address": {
                "city": "Beverly Hills", "state": "California",
                "ISO3166-2-lvl4": "US-CA", "postcode": "90210", "country_code": "us"
            }
        }]"#;
        let location = places(body).remove(0).into_location().unwrap();
        assert_eq!(location.latitude, 34.0901);
        assert_eq!(location.longitude, -118.4065);
        assert_eq!(location.city.as_deref(), Some("Beverly Hills"));
        assert_eq!(location.state_code.as_deref(), Some("CA"));
        assert_eq!(location.zipcode.as_deref(), Some("90210"));
        assert_eq!(location.country_code.as_deref(), Some("US"));
    }

    #[test]
    fn town_stands_in_for_city_and_state_name_for_code() {
        let body = r#"[{"lat": "1", "lon": "2",
            "address": {"town": "Smallville", "state": "Kansas"}}]"#;
        let location = places(body).remove(0).into_location().unwrap();
        assert_eq!(location.city.as_deref(), Some("Smallville"));
        assert_eq!(location.state_code.as_deref(), Some("Kansas"));
        assert_eq!(location.formatted_address, None);
    }

    #[test]
    fn missing_address_block_is_allowed() {
        let location = places(r#"[{"lat": "0.5", "lon": "0.25"}]"#)
            .remove(0)
            .into_location()
            .unwrap();
        assert_eq!(location, GeoLocation::at(0.5, 0.25));
    }

    #[test]
    fn bad_coordinate_is_malformed() {
        let err = places(r#"[{"lat": "north", "lon": "0"}]"#)
            .remove(0)
            .into_location()
            .unwrap_err();
        assert_matches!(err, GeocodeError::Malformed(_));
    }

    #[test]
    fn client_builds_from_config() {
        let config = GeocoderConfig {
            base_url: "http://localhost:8080".into(),
            timeout_secs: 1,
        };
        let geocoder = HttpGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.base_url, "http://localhost:8080");
    }
}
