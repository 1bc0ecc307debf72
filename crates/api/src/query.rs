//! Shared query parameter types for API handlers.
//!
//! Values are lenient the way the rest of the API is lenient: unknown sort
//! keys fall back to defaults and out-of-range numbers are clamped rather
//! than rejected.

use serde::Deserialize;

use autolog_db::repositories::car_repo::MAX_PAGE_SIZE;

/// Default page size for list endpoints.
const DEFAULT_PER_PAGE: i64 = 10;

/// Generic pagination parameters (`?page=&per_page=`), 1-based.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PaginationParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Clamped to the repository's hard page-size cap so the offset and the
    /// pager metadata are computed from the same limit the query runs with.
    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

/// Generic sort parameters (`?sort_by=&sort_order=`).
///
/// The sort key whitelist lives with each repository; this only decides the
/// direction. Anything other than `asc` means descending.
#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl SortParams {
    pub fn sort_by(&self) -> &str {
        self.sort_by.as_deref().unwrap_or("created_at")
    }

    pub fn ascending(&self) -> bool {
        matches!(self.sort_order.as_deref(), Some("asc") | Some("ASC"))
    }
}
