//! Repository for the `jobs` table.
//!
//! Listing queries take a [`SearchPlan`] compiled from the request; every
//! request-derived value reaches SQL as a bound parameter.

use jobboard_core::job_query::RadiusQuery;
use jobboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::job::{Job, JobWithCompany, JobWithCompanySummary, NewJob};
use crate::query_builder::{bind_query_as, bind_query_scalar, radius_predicate, SearchPlan};

/// Column list for `jobs` queries. Every query aliases the table as `j`.
const COLUMNS: &str = "\
    j.id, j.title, j.description, j.requirements, j.responsibilities, \
    j.salary_min, j.salary_max, j.salary_currency, j.salary_is_public, \
    j.job_type, j.experience_level, j.company_id, \
    j.location_lng, j.location_lat, j.location_formatted_address, \
    j.location_city, j.location_state, j.location_zip_code, j.location_country, \
    j.location_is_remote, j.visa_sponsorship, j.relocation_assistance, \
    j.posted_by, j.expires_at, j.is_active, j.skills, j.industry, \
    j.created_at, j.updated_at";

/// Provides search, lookup and insert operations for job postings.
pub struct JobRepo;

impl JobRepo {
    /// Number of jobs matching the plan's filter.
    pub async fn count(pool: &PgPool, plan: &SearchPlan) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM jobs j WHERE {}", plan.where_sql);
        bind_query_scalar(sqlx::query_scalar::<_, i64>(&query), &plan.binds)
            .fetch_one(pool)
            .await
    }

    /// One page of matching jobs in plan order, each with its company's
    /// name and logo.
    pub async fn search(
        pool: &PgPool,
        plan: &SearchPlan,
    ) -> Result<Vec<JobWithCompanySummary>, sqlx::Error> {
        let (limit, offset) = plan.page_placeholders();
        let query = format!(
            "SELECT {COLUMNS}, c.name AS company_name, c.logo AS company_logo \
             FROM jobs j \
             JOIN companies c ON c.id = j.company_id \
             WHERE {} \
             ORDER BY {} \
             LIMIT ${limit} OFFSET ${offset}",
            plan.where_sql, plan.order_by
        );
        tracing::debug!(sql = %query, binds = plan.binds.len(), "Job search");
        bind_query_as(sqlx::query_as::<_, JobWithCompanySummary>(&query), &plan.binds)
            .bind(plan.limit)
            .bind(plan.offset)
            .fetch_all(pool)
            .await
    }

    /// Every job whose position lies inside `radius`. Unpaginated and
    /// without the company embedded.
    pub async fn find_within_radius(
        pool: &PgPool,
        radius: &RadiusQuery,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let mut binds = Vec::new();
        let predicate = radius_predicate(radius, &mut binds);
        let query = format!("SELECT {COLUMNS} FROM jobs j WHERE {predicate} ORDER BY j.id");
        bind_query_as(sqlx::query_as::<_, Job>(&query), &binds)
            .fetch_all(pool)
            .await
    }

    /// Find a job by ID with its full company embedded.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<JobWithCompany>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, \
                 c.name AS company_name, c.description AS company_description, \
                 c.website AS company_website, c.logo AS company_logo, \
                 c.owner_id AS company_owner_id, c.created_at AS company_created_at, \
                 c.updated_at AS company_updated_at \
             FROM jobs j \
             JOIN companies c ON c.id = j.company_id \
             WHERE j.id = $1"
        );
        sqlx::query_as::<_, JobWithCompany>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a job, returning the created row. `None` inputs take the
    /// column defaults (USD, private salary, active, no sponsorship).
    pub async fn create(pool: &PgPool, input: &NewJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs AS j (
                 title, description, requirements, responsibilities,
                 salary_min, salary_max, salary_currency, salary_is_public,
                 job_type, experience_level, company_id,
                 location_lng, location_lat, location_formatted_address,
                 location_city, location_state, location_zip_code, location_country,
                 location_is_remote, visa_sponsorship, relocation_assistance,
                 posted_by, expires_at, is_active, skills, industry
             )
             VALUES (
                 $1, $2, $3, $4,
                 $5, $6, COALESCE($7, 'USD'), COALESCE($8, FALSE),
                 $9, $10, $11,
                 $12, $13, $14,
                 $15, $16, $17, $18,
                 $19, COALESCE($20, FALSE), COALESCE($21, FALSE),
                 $22, $23, COALESCE($24, TRUE), $25, $26
             )
             RETURNING {COLUMNS}"
        );
        let location = &input.location;
        sqlx::query_as::<_, Job>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.requirements)
            .bind(&input.responsibilities)
            .bind(input.salary_min)
            .bind(input.salary_max)
            .bind(&input.salary_currency)
            .bind(input.salary_is_public)
            .bind(&input.job_type)
            .bind(&input.experience_level)
            .bind(input.company_id)
            .bind(location.longitude)
            .bind(location.latitude)
            .bind(&location.formatted_address)
            .bind(&location.city)
            .bind(&location.state)
            .bind(&location.zip_code)
            .bind(&location.country)
            .bind(location.is_remote)
            .bind(input.visa_sponsorship)
            .bind(input.relocation_assistance)
            .bind(input.posted_by)
            .bind(input.expires_at)
            .bind(input.is_active)
            .bind(&input.skills)
            .bind(&input.industry)
            .fetch_one(pool)
            .await
    }
}
