//! Company entity model and DTOs.

use jobboard_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    /// The user who owns the company and may post jobs for it.
    #[serde(rename = "user")]
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The `name logo` projection embedded in job listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanySummary {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub name: String,
    pub logo: Option<String>,
}

/// DTO for creating a company. Companies are normally created by the
/// company service; this exists for seeding and tests.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub owner_id: DbId,
}
