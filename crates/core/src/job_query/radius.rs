//! Radius search around a geocoded postal code.
//!
//! A linear distance is turned into an angle by dividing by a fixed Earth
//! radius, and a point matches when its great-circle angular distance from
//! the center is within that angle. The storage layer evaluates the same
//! predicate in SQL.

use crate::error::CoreError;
use crate::geocoding::{resolve_first, GeoLocation, Geocoder};

/// Earth radius used to convert miles to radians.
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Earth radius used to convert kilometers to radians.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceUnit {
    #[default]
    Miles,
    Kilometers,
}

impl DistanceUnit {
    /// Accepts `mi`, `mile`, `miles`, `km`, `kilometer`, `kilometers`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            "km" | "kilometer" | "kilometers" => Ok(Self::Kilometers),
            other => Err(CoreError::contract(format!(
                "Unsupported distance unit '{other}'; expected mi or km"
            ))),
        }
    }

    pub fn earth_radius(self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MILES,
            Self::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

/// A spherical cap: center plus angular radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusQuery {
    pub longitude: f64,
    pub latitude: f64,
    pub radius_radians: f64,
}

impl RadiusQuery {
    /// Center on `location` with a radius of `distance` `unit`s.
    pub fn from_location(
        location: &GeoLocation,
        distance: f64,
        unit: DistanceUnit,
    ) -> Result<Self, CoreError> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(CoreError::contract(format!(
                "Distance must be a non-negative number, got {distance}"
            )));
        }
        Ok(Self {
            longitude: location.longitude,
            latitude: location.latitude,
            radius_radians: distance / unit.earth_radius(),
        })
    }

    /// `(longitude, latitude)`, the order the storage predicate expects.
    pub fn center(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }

    /// Whether the point lies inside the cap (boundary included).
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        angular_distance(self.longitude, self.latitude, longitude, latitude) <= self.radius_radians
    }
}

/// Great-circle angle in radians between two `(lng, lat)` points in degrees
/// (haversine form).
pub fn angular_distance(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * h.clamp(0.0, 1.0).sqrt().asin()
}

/// Parse the `:distance` path segment.
pub fn parse_distance(raw: &str) -> Result<f64, CoreError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| {
            CoreError::contract(format!(
                "Distance must be a non-negative number, got '{raw}'"
            ))
        })
}

/// Geocode `zipcode` and build a radius of `distance_miles` around it.
pub async fn build_radius_query<G>(
    zipcode: &str,
    distance_miles: f64,
    geocoder: &G,
) -> Result<RadiusQuery, CoreError>
where
    G: Geocoder + ?Sized,
{
    build_radius_query_in(zipcode, distance_miles, DistanceUnit::Miles, geocoder).await
}

/// [`build_radius_query`] with an explicit distance unit.
pub async fn build_radius_query_in<G>(
    zipcode: &str,
    distance: f64,
    unit: DistanceUnit,
    geocoder: &G,
) -> Result<RadiusQuery, CoreError>
where
    G: Geocoder + ?Sized,
{
    let location = resolve_first(geocoder, zipcode).await?;
    RadiusQuery::from_location(&location, distance, unit)
}
