//! Shared response envelope types for API handlers.
//!
//! Successful responses carry `success: true` next to the payload; errors
//! use `{ "success": false, "error": ... }` (see [`crate::error`]).

use jobboard_core::job_query::PaginationResult;
use serde::Serialize;

/// `{ "success": true, "data": T }` envelope for single resources.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "count": n, "pagination"?: {...}, "data": [...] }`
/// envelope for collections. `pagination` is omitted for unpaginated
/// endpoints.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationResult>,
    pub data: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination: None,
            data,
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationResult) -> Self {
        self.pagination = Some(pagination);
        self
    }
}
