//! Job posting vocabulary and field validation.
//!
//! The accepted job types and experience levels are a closed set; the
//! storage layer keeps them as plain text, so every write goes through the
//! checks here first.

use validator::ValidationError;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Accepted values for a job's `jobType`.
pub const JOB_TYPES: &[&str] = &[
    "Full-time",
    "Part-time",
    "Contract",
    "Temporary",
    "Internship",
    "Remote",
];

/// Accepted values for a job's `experienceLevel`.
pub const EXPERIENCE_LEVELS: &[&str] = &["Entry", "Mid", "Senior", "Executive"];

/// Salary currency used when a posting does not name one.
pub const DEFAULT_SALARY_CURRENCY: &str = "USD";

/// GeoJSON geometry type reported for job locations.
pub const LOCATION_POINT: &str = "Point";

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// `validator` hook: `job_type` must be one of [`JOB_TYPES`].
pub fn validate_job_type(job_type: &str) -> Result<(), ValidationError> {
    if JOB_TYPES.contains(&job_type) {
        Ok(())
    } else {
        let mut err = ValidationError::new("job_type");
        let message = format!("Invalid job type '{job_type}'. Must be one of: {JOB_TYPES:?}");
        err.message = Some(message.into());
        Err(err)
    }
}

/// `validator` hook: `level` must be one of [`EXPERIENCE_LEVELS`].
pub fn validate_experience_level(level: &str) -> Result<(), ValidationError> {
    if EXPERIENCE_LEVELS.contains(&level) {
        Ok(())
    } else {
        let mut err = ValidationError::new("experience_level");
        err.message = Some(
            format!("Invalid experience level '{level}'. Must be one of: {EXPERIENCE_LEVELS:?}")
                .into(),
        );
        Err(err)
    }
}
