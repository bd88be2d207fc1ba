//! Route definitions for the `/jobs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /                              -> list_jobs
/// POST   /                              -> create_job (employer/admin)
/// GET    /radius/{zipcode}/{distance}   -> jobs_in_radius
/// GET    /{id}                          -> get_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/radius/{zipcode}/{distance}", get(jobs::jobs_in_radius))
        .route("/{id}", get(jobs::get_job))
}
