//! Job board domain logic.
//!
//! Zero internal dependencies: the error taxonomy, shared id/time types,
//! role names, the job field vocabulary, the geocoding boundary and the job
//! search query engine all live here so the storage and HTTP layers can
//! share them.

pub mod error;
pub mod geocoding;
pub mod job;
pub mod job_query;
pub mod roles;
pub mod types;
