//! Job posting entity model, its API document shape, and insert DTOs.
//!
//! Rows are flat (`salary_min`, `location_city`, ...); the API serves the
//! nested camelCase document the frontend was built against, with the id
//! under `_id` and `company` either an id or an embedded company.

use jobboard_core::geocoding::GeoLocation;
use jobboard_core::job::LOCATION_POINT;
use jobboard_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::company::{Company, CompanySummary};

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row from the `jobs` table.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Job {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: String,
    pub salary_is_public: bool,
    pub job_type: String,
    pub experience_level: Option<String>,
    pub company_id: DbId,
    pub location_lng: Option<f64>,
    pub location_lat: Option<f64>,
    pub location_formatted_address: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_zip_code: Option<String>,
    pub location_country: Option<String>,
    pub location_is_remote: bool,
    pub visa_sponsorship: bool,
    pub relocation_assistance: bool,
    pub posted_by: DbId,
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub skills: Vec<String>,
    pub industry: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A job joined with its company's `name` and `logo`.
#[derive(Debug, Clone, FromRow)]
pub struct JobWithCompanySummary {
    #[sqlx(flatten)]
    pub job: Job,
    pub company_name: String,
    pub company_logo: Option<String>,
}

/// A job joined with its full company row (company columns are prefixed).
#[derive(Debug, Clone, FromRow)]
pub struct JobWithCompany {
    #[sqlx(flatten)]
    pub job: Job,
    pub company_name: String,
    pub company_description: Option<String>,
    pub company_website: Option<String>,
    pub company_logo: Option<String>,
    pub company_owner_id: DbId,
    pub company_created_at: Timestamp,
    pub company_updated_at: Timestamp,
}

impl Job {
    /// Document with `company` left as the bare id.
    pub fn into_document(self) -> JobDocument {
        let company = CompanyRef::Id(self.company_id);
        JobDocument::new(self, company)
    }
}

impl JobWithCompanySummary {
    pub fn into_document(self) -> JobDocument {
        let company = CompanyRef::Summary(CompanySummary {
            id: self.job.company_id,
            name: self.company_name,
            logo: self.company_logo,
        });
        JobDocument::new(self.job, company)
    }
}

impl JobWithCompany {
    pub fn into_document(self) -> JobDocument {
        let company = CompanyRef::Full(Company {
            id: self.job.company_id,
            name: self.company_name,
            description: self.company_description,
            website: self.company_website,
            logo: self.company_logo,
            owner_id: self.company_owner_id,
            created_at: self.company_created_at,
            updated_at: self.company_updated_at,
        });
        JobDocument::new(self.job, company)
    }
}

// ---------------------------------------------------------------------------
// API document
// ---------------------------------------------------------------------------

/// The referenced company, as populated for the current endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompanyRef {
    Id(DbId),
    Summary(CompanySummary),
    Full(Company),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryDocument {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
    pub is_public: bool,
}

/// GeoJSON-style point plus address details. `coordinates` is
/// `[longitude, latitude]`, or empty when the job has no position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDocument {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub is_remote: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDocument {
    #[serde(rename = "_id")]
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub salary: SalaryDocument,
    pub job_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    pub company: CompanyRef,
    pub location: LocationDocument,
    pub visa_sponsorship: bool,
    pub relocation_assistance: bool,
    pub posted_by: DbId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
    pub is_active: bool,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobDocument {
    pub fn new(job: Job, company: CompanyRef) -> Self {
        let coordinates = match (job.location_lng, job.location_lat) {
            (Some(lng), Some(lat)) => vec![lng, lat],
            _ => Vec::new(),
        };
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            requirements: job.requirements,
            responsibilities: job.responsibilities,
            salary: SalaryDocument {
                min: job.salary_min,
                max: job.salary_max,
                currency: job.salary_currency,
                is_public: job.salary_is_public,
            },
            job_type: job.job_type,
            experience_level: job.experience_level,
            company,
            location: LocationDocument {
                kind: LOCATION_POINT,
                coordinates,
                formatted_address: job.location_formatted_address,
                city: job.location_city,
                state: job.location_state,
                zip_code: job.location_zip_code,
                country: job.location_country,
                is_remote: job.location_is_remote,
            },
            visa_sponsorship: job.visa_sponsorship,
            relocation_assistance: job.relocation_assistance,
            posted_by: job.posted_by,
            expires_at: job.expires_at,
            is_active: job.is_active,
            skills: job.skills,
            industry: job.industry,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Inserts
// ---------------------------------------------------------------------------

/// Resolved location columns for an insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewJobLocation {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub is_remote: bool,
}

impl NewJobLocation {
    /// No position; flagged remote.
    pub fn remote() -> Self {
        Self {
            is_remote: true,
            ..Self::default()
        }
    }

    /// Point and address details taken from a geocoding candidate.
    pub fn from_geocode(location: &GeoLocation) -> Self {
        Self {
            longitude: Some(location.longitude),
            latitude: Some(location.latitude),
            formatted_address: location.formatted_address.clone(),
            city: location.city.clone(),
            state: location.state_code.clone(),
            zip_code: location.zipcode.clone(),
            country: location.country_code.clone(),
            is_remote: false,
        }
    }
}

/// A validated job ready to insert. `None` fields take the column default.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub salary_is_public: Option<bool>,
    pub job_type: String,
    pub experience_level: Option<String>,
    pub company_id: DbId,
    pub location: NewJobLocation,
    pub visa_sponsorship: Option<bool>,
    pub relocation_assistance: Option<bool>,
    pub posted_by: DbId,
    pub expires_at: Option<Timestamp>,
    pub is_active: Option<bool>,
    pub skills: Vec<String>,
    pub industry: Option<String>,
}
