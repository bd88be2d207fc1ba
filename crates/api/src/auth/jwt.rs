//! Bearer token verification.
//!
//! Tokens are HS256 JWTs minted by the account service with the payload
//! `{ id, role, iat, exp }`. This service only verifies them;
//! [`JwtConfig::issue`] mints compatible tokens for tooling and tests.

use jobboard_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// `30d`, matching the account service's default session length.
const DEFAULT_EXPIRY: &str = "30d";

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub id: DbId,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    pub secret: String,
    /// Lifetime of tokens minted by [`JwtConfig::issue`].
    pub expiry_secs: i64,
}

impl JwtConfig {
    /// | Env Var      | Required | Default |
    /// |--------------|----------|---------|
    /// | `JWT_SECRET` | **yes**  | --      |
    /// | `JWT_EXPIRE` | no       | `30d`   |
    ///
    /// `JWT_EXPIRE` takes a count with an optional `s`, `m`, `h` or `d`
    /// suffix; a bare number is seconds.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or `JWT_EXPIRE` does not
    /// parse.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let raw = std::env::var("JWT_EXPIRE").unwrap_or_else(|_| DEFAULT_EXPIRY.into());
        let expiry_secs = parse_expiry(&raw)
            .unwrap_or_else(|| panic!("JWT_EXPIRE '{raw}' is not a duration like 30d or 12h"));

        Self {
            secret,
            expiry_secs,
        }
    }

    /// Mint a token for `id` with `role`, valid for `expiry_secs`.
    pub fn issue(&self, id: DbId, role: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            id,
            role: role.to_string(),
            iat,
            exp: iat + self.expiry_secs,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature and expiry and return the payload.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

/// Parse `90`, `45m`, `12h` or `30d` into seconds.
fn parse_expiry(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (digits, scale) = match raw.char_indices().last()? {
        (i, 's') => (&raw[..i], 1),
        (i, 'm') => (&raw[..i], 60),
        (i, 'h') => (&raw[..i], 60 * 60),
        (i, 'd') => (&raw[..i], 24 * 60 * 60),
        _ => (raw, 1),
    };
    digits
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .and_then(|n| n.checked_mul(scale))
}
