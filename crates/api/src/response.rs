//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to get
//! compile-time type safety and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A page of results plus the pagination metadata clients use to render
/// pagers.
#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T: Serialize> Paginated<T> {
    /// Assemble a page. `total_pages` rounds up; an empty result set is one
    /// empty page, not zero pages.
    pub fn new(data: Vec<T>, page: i64, per_page: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            1
        } else {
            (total_items + per_page - 1) / per_page
        };
        Self {
            data,
            page,
            per_page,
            total_items,
            total_pages,
            has_previous_page: page > 1,
            has_next_page: page < total_pages,
        }
    }
}
