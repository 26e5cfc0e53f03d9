//! Paginated list envelope and query parameters.

use serde::{Deserialize, Serialize};

/// Page selection for list endpoints.
///
/// Unset fields are left off the query string so the server applies its own
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PaginationParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }
}

/// Query for `GET /trans-category`: pagination plus an optional type filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
}

/// Pagination metadata returned next to each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// One page of results.
///
/// # JSON Example
///
/// ```json
/// {
///   "data": [ ... ],
///   "meta": { "page": 1, "limit": 10, "total": 42, "totalPages": 5 }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResponse<T> {
    /// True when no further page exists after this one.
    pub fn is_last_page(&self) -> bool {
        self.meta.page >= self.meta.total_pages
    }
}
