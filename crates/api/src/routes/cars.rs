//! Route definitions for the `/cars` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::cars;
use crate::state::AppState;

/// Routes mounted at `/cars`.
///
/// Role and ownership requirements are enforced by handler extractors.
///
/// ```text
/// GET    /                                -> list_cars (both roles)
/// POST   /                                -> create_car (mechanic)
/// GET    /{car_id}                        -> get_car (ownership-gated)
/// PATCH  /{car_id}                        -> update_car (mechanic)
/// DELETE /{car_id}                        -> delete_car (mechanic)
/// POST   /{car_id}/history                -> add_service (mechanic)
/// DELETE /{car_id}/history/{record_id}    -> delete_service (mechanic)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cars::list_cars).post(cars::create_car))
        .route(
            "/{car_id}",
            get(cars::get_car)
                .patch(cars::update_car)
                .delete(cars::delete_car),
        )
        .route("/{car_id}/history", post(cars::add_service))
        .route(
            "/{car_id}/history/{record_id}",
            delete(cars::delete_service),
        )
}
