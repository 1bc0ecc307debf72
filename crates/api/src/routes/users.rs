//! Route definitions for the `/users` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// Role requirements are enforced by handler extractors.
///
/// ```text
/// GET    /            -> list_customers (mechanic)
/// GET    /{id}        -> get_user (mechanic)
/// PUT    /{id}        -> update_profile (self or mechanic)
/// DELETE /{id}        -> delete_user (mechanic)
/// PATCH  /{id}/status -> update_status (mechanic)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_customers))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_profile)
                .delete(users::delete_user),
        )
        .route("/{id}/status", patch(users::update_status))
}
