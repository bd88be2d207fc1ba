//! Repository for the `companies` table.

use jobboard_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CreateCompany};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, website, logo, owner_id, created_at, updated_at";

/// Provides lookups and inserts for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, description, website, logo, owner_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.website)
            .bind(&input.logo)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a company by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
