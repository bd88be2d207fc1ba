use std::sync::Arc;

use jobboard_core::geocoding::Geocoder;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: jobboard_db::DbPool,
    /// Server configuration (JWT secret, pagination defaults, ...).
    pub config: Arc<ServerConfig>,
    /// Address and postal-code lookup used by radius search and job creation.
    pub geocoder: Arc<dyn Geocoder>,
}
