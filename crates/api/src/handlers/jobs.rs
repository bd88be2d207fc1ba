//! Handlers for the `/jobs` resource.
//!
//! Listing, radius search and lookup are public. Creating a job requires
//! the `employer` or `admin` role, and non-admins may only post for
//! companies they own.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use jobboard_core::error::CoreError;
use jobboard_core::geocoding::resolve_first;
use jobboard_core::job::{validate_experience_level, validate_job_type};
use jobboard_core::job_query::{
    build_pagination, build_radius_query_in, parse_distance, DistanceUnit, FieldSelection,
    JobSearchQuery, QueryParameters,
};
use jobboard_core::roles::ROLE_ADMIN;
use jobboard_core::types::{DbId, Timestamp};
use jobboard_db::models::job::{JobDocument, NewJob, NewJobLocation};
use jobboard_db::query_builder::SearchPlan;
use jobboard_db::repositories::{CompanyRepo, JobRepo};
use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireEmployer;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /api/v1/jobs/radius/{zipcode}/{distance}`.
#[derive(Debug, Default, Deserialize)]
pub struct RadiusParams {
    /// `mi` (default) or `km`.
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_salary_range"))]
pub struct SalaryInput {
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub min: Option<f64>,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub max: Option<f64>,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    pub is_public: Option<bool>,
}

/// Body of `POST /api/v1/jobs`. `location` is a free-form address that is
/// geocoded unless `isRemote` is set.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[validate(length(min = 1, max = 200, message = "Please add a title"))]
    pub title: String,
    #[validate(length(min = 1, message = "Please add a description"))]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[validate(nested)]
    pub salary: Option<SalaryInput>,
    #[validate(custom(function = "validate_job_type"))]
    pub job_type: String,
    #[validate(custom(function = "validate_experience_level"))]
    pub experience_level: Option<String>,
    pub company: DbId,
    pub location: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
    pub visa_sponsorship: Option<bool>,
    pub relocation_assistance: Option<bool>,
    pub expires_at: Option<Timestamp>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub industry: Option<String>,
}

fn validate_salary_range(salary: &SalaryInput) -> Result<(), ValidationError> {
    match (salary.min, salary.max) {
        (Some(min), Some(max)) if min > max => {
            let mut err = ValidationError::new("salary_range");
            err.message = Some("Minimum salary cannot exceed maximum salary".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

impl CreateJobRequest {
    fn into_new_job(self, posted_by: DbId, location: NewJobLocation) -> NewJob {
        let salary = self.salary.unwrap_or_default();
        NewJob {
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            responsibilities: self.responsibilities,
            salary_min: salary.min,
            salary_max: salary.max,
            salary_currency: salary.currency,
            salary_is_public: salary.is_public,
            job_type: self.job_type,
            experience_level: self.experience_level,
            company_id: self.company,
            location,
            visa_sponsorship: self.visa_sponsorship,
            relocation_assistance: self.relocation_assistance,
            posted_by,
            expires_at: self.expires_at,
            is_active: self.is_active,
            skills: self.skills,
            industry: self.industry,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serialize a job and apply the caller's projection.
fn project(selection: &FieldSelection, document: JobDocument) -> AppResult<Value> {
    let value = serde_json::to_value(document)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize job: {e}")))?;
    Ok(selection.apply(value))
}

/// Resolve where a new job is. Remote jobs have no position; everything
/// else is geocoded from the address string.
async fn resolve_location(state: &AppState, input: &CreateJobRequest) -> AppResult<NewJobLocation> {
    if input.is_remote {
        return Ok(NewJobLocation::remote());
    }
    let address = input.location.as_deref().unwrap_or_default();
    if address.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Please add a location or mark the job as remote".into(),
        )));
    }
    let geo = resolve_first(state.geocoder.as_ref(), address).await?;
    Ok(NewJobLocation::from_geocode(&geo))
}

/// Only the company's owner or an admin may post jobs for it.
fn authorize_company(owner_id: DbId, company_id: DbId, user: &AuthUser) -> AppResult<()> {
    if owner_id != user.user_id && user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Unauthorized(format!(
            "User {} is not authorized to add a job to company {company_id}",
            user.user_id
        ))));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs
///
/// Filter with `field=value` / `field[op]=value` (op: gt, gte, lt, lte, in),
/// order with `sort`, project with `select`, page with `page` and `limit`.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<QueryParameters>,
) -> AppResult<impl IntoResponse> {
    let defaults = state.config.query_defaults;
    let query = JobSearchQuery::from_params(&params, &defaults)?;
    let plan = SearchPlan::compile(&query)?;

    tracing::debug!(filter = %query.filter.to_json(), "Listing jobs");

    let total = JobRepo::count(&state.pool, &plan).await?;
    let rows = JobRepo::search(&state.pool, &plan).await?;
    let (_, pagination) = build_pagination(&params, total, &defaults);

    let data = rows
        .into_iter()
        .map(|row| project(&query.selection, row.into_document()))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(ListResponse::new(data).with_pagination(pagination)))
}

// ---------------------------------------------------------------------------
// Radius
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/radius/{zipcode}/{distance}
///
/// Every job within `distance` miles (or km with `?unit=km`) of the
/// geocoded postal code. Not paginated.
pub async fn jobs_in_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
    Query(params): Query<RadiusParams>,
) -> AppResult<impl IntoResponse> {
    let distance = parse_distance(&distance)?;
    let unit = params
        .unit
        .as_deref()
        .map(DistanceUnit::parse)
        .transpose()?
        .unwrap_or_default();

    let radius = build_radius_query_in(&zipcode, distance, unit, state.geocoder.as_ref()).await?;
    let jobs = JobRepo::find_within_radius(&state.pool, &radius).await?;

    tracing::debug!(
        zipcode = %zipcode,
        radius_radians = radius.radius_radians,
        matches = jobs.len(),
        "Radius search",
    );

    let data: Vec<JobDocument> = jobs.into_iter().map(|job| job.into_document()).collect();
    Ok(Json(ListResponse::new(data)))
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}
///
/// A single job with its company embedded. Ids that are not integers are
/// reported as not found, echoing the id as given.
pub async fn get_job(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let not_found = || AppError::Core(CoreError::not_found("Job", &raw_id));

    let id: DbId = raw_id.parse().map_err(|_| not_found())?;
    let job = JobRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(DataResponse::new(job.into_document())))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Create a job for a company the caller owns (admins may post for any
/// company). Returns 201 with the created job.
pub async fn create_job(
    RequireEmployer(user): RequireEmployer,
    State(state): State<AppState>,
    body: Result<Json<CreateJobRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    input.validate()?;

    let company = CompanyRepo::find_by_id(&state.pool, input.company)
        .await?
        .ok_or_else(|| CoreError::reference_not_found("company", input.company))?;
    authorize_company(company.owner_id, company.id, &user)?;

    let location = resolve_location(&state, &input).await?;
    let job = JobRepo::create(&state.pool, &input.into_new_job(user.user_id, location)).await?;

    tracing::info!(
        job_id = job.id,
        company_id = job.company_id,
        user_id = user.user_id,
        "Job created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(job.into_document()))))
}
