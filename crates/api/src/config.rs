use jobboard_core::job_query::{QueryDefaults, DEFAULT_LIMIT, DEFAULT_PAGE};

use crate::auth::jwt::JwtConfig;
use crate::geocoder::GeocoderConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`
    /// (falling back to `FRONTEND_URL`).
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT validation configuration.
    pub jwt: JwtConfig,
    /// Pagination defaults for job listings.
    pub query_defaults: QueryDefaults,
    /// Geocoding service endpoint and client settings.
    pub geocoder: GeocoderConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `5000`                     |
    /// | `CORS_ORIGINS`         | `FRONTEND_URL`, else `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `JOBS_DEFAULT_PAGE`    | `1`                        |
    /// | `JOBS_DEFAULT_LIMIT`   | `25`                       |
    /// | `JOBS_MAX_LIMIT`       | unset (no ceiling)         |
    ///
    /// See [`JwtConfig::from_env`] and [`GeocoderConfig::from_env`] for the
    /// nested sections.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .or_else(|_| std::env::var("FRONTEND_URL"))
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let query_defaults = QueryDefaults::new(
            env_i64("JOBS_DEFAULT_PAGE", DEFAULT_PAGE),
            env_i64("JOBS_DEFAULT_LIMIT", DEFAULT_LIMIT),
            std::env::var("JOBS_MAX_LIMIT").ok().map(|raw| {
                raw.parse()
                    .expect("JOBS_MAX_LIMIT must be a valid integer")
            }),
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            query_defaults,
            geocoder: GeocoderConfig::from_env(),
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a valid integer")),
        Err(_) => default,
    }
}
