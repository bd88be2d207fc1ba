//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireEmployer`] -- Requires `employer` or `admin` role.

pub mod auth;
pub mod rbac;
