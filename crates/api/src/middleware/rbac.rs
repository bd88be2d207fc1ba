//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jobboard_core::error::CoreError;
use jobboard_core::roles::{ROLE_ADMIN, ROLE_EMPLOYER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `employer` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn post_job(RequireEmployer(user): RequireEmployer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireEmployer(pub AuthUser);

impl FromRequestParts<AppState> for RequireEmployer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_EMPLOYER {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "User role {} is not authorized to access this route",
                user.role
            ))));
        }
        Ok(RequireEmployer(user))
    }
}
