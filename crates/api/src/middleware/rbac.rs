//! Role and ownership based access-control extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role (or,
//! for customers, car ownership) does not meet the requirement. Role
//! membership is always checked before ownership, so a mechanic is never
//! subjected to an ownership lookup.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use axum::RequestPartsExt;

use autolog_core::error::CoreError;
use autolog_core::roles::{ROLE_CUSTOMER, ROLE_MECHANIC};
use autolog_core::types::DbId;
use autolog_db::repositories::CarRepo;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `mechanic` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn mechanic_only(RequireMechanic(user): RequireMechanic) -> AppResult<Json<()>> {
///     // user is guaranteed to be a mechanic here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireMechanic(pub AuthUser);

impl FromRequestParts<AppState> for RequireMechanic {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_MECHANIC {
            return Err(AppError::Core(CoreError::Forbidden(
                "Mechanic role required".into(),
            )));
        }
        Ok(RequireMechanic(user))
    }
}

/// Requires access to the car addressed by the route's `car_id` parameter.
///
/// - Mechanics always pass; no ownership lookup is performed for them.
/// - Customers pass when the route has no `car_id` (list endpoints filter
///   to the customer's own cars downstream) or when the car's owner is the
///   customer themself. A car that does not exist looks the same as a car
///   the customer does not own: 403.
pub struct RequireCarAccess(pub AuthUser);

impl FromRequestParts<AppState> for RequireCarAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role == ROLE_MECHANIC {
            return Ok(RequireCarAccess(user));
        }

        if user.role != ROLE_CUSTOMER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Access denied".into(),
            )));
        }

        let Some(car_id) = route_car_id(parts).await? else {
            return Ok(RequireCarAccess(user));
        };

        let owner_id = CarRepo::find_owner_id(&state.pool, car_id)
            .await
            .map_err(AppError::Database)?;

        match owner_id {
            Some(owner) if owner == user.user_id => Ok(RequireCarAccess(user)),
            _ => Err(AppError::Core(CoreError::Forbidden("Access denied".into()))),
        }
    }
}

/// Pull the `car_id` path parameter out of the matched route, if any.
///
/// A route without the parameter yields `Ok(None)`; a malformed value is a
/// 400 before any ownership check runs.
async fn route_car_id(parts: &mut Parts) -> Result<Option<DbId>, AppError> {
    let params = parts
        .extract::<Path<HashMap<String, String>>>()
        .await
        .map(|Path(params)| params)
        .unwrap_or_default();

    match params.get("car_id") {
        Some(raw) => raw
            .parse::<DbId>()
            .map(Some)
            .map_err(|_| AppError::BadRequest("Invalid car id".into())),
        None => Ok(None),
    }
}
