pub mod auth;
pub mod cars;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (cookie-identified session)
/// /auth/logout                         logout (cookie-identified session)
///
/// /users                               list customers (mechanic)
/// /users/{id}                          get (mechanic), update profile (self or mechanic),
///                                      delete (mechanic)
/// /users/{id}/status                   change account status (mechanic)
///
/// /cars                                list (both roles, customers self-scoped), create (mechanic)
/// /cars/{car_id}                       get (ownership-gated), update, delete (mechanic)
/// /cars/{car_id}/history               add service record (mechanic)
/// /cars/{car_id}/history/{record_id}   delete service record (mechanic)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/cars", cars::router())
}
