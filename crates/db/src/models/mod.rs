//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - The document shape the API serializes for it
//! - An insert struct for writes

pub mod company;
pub mod job;
