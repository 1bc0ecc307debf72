//! Handlers for the `/users` resource.
//!
//! Customer management is mechanic-only; profile updates are allowed for
//! the user themself or a mechanic.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use autolog_core::error::CoreError;
use autolog_core::roles::{ROLE_CUSTOMER, ROLE_MECHANIC};
use autolog_core::status::is_valid_user_status;
use autolog_core::types::DbId;
use autolog_db::models::user::{UpdateUser, UserResponse};
use autolog_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireMechanic;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Request body for `PUT /users/{id}`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 30, message = "Name must be 3 to 30 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub avatar: Option<String>,
}

/// GET /api/v1/users
///
/// List customer accounts. Mechanic only.
pub async fn list_customers(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let customers = UserRepo::list_by_role(&state.pool, ROLE_CUSTOMER)
        .await?
        .into_iter()
        .map(|u| u.into_response())
        .collect();

    Ok(Json(DataResponse { data: customers }))
}

/// GET /api/v1/users/{id}
///
/// Fetch one user. Mechanic only.
pub async fn get_user(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;

    Ok(Json(user.into_response()))
}

/// PATCH /api/v1/users/{id}/status
///
/// Change a user's account status (active / pending / suspended).
/// Mechanic only. Suspension takes full effect once outstanding access
/// tokens expire.
pub async fn update_status(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<UserResponse>> {
    if !is_valid_user_status(&input.status) {
        return Err(CoreError::Validation(format!("Unknown status: {}", input.status)).into());
    }

    let user = UserRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or(CoreError::NotFound { entity: "user", id })?;

    tracing::info!(user_id = id, status = %user.status, "User status changed");
    Ok(Json(user.into_response()))
}

/// PUT /api/v1/users/{id}
///
/// Update profile fields. Allowed for the user themself or any mechanic.
/// A supplied password is re-hashed before storage.
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    if auth_user.user_id != id && auth_user.role != ROLE_MECHANIC {
        return Err(CoreError::Forbidden("Cannot modify another user's profile".into()).into());
    }

    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let password_hash = match &input.password {
        Some(password) => Some(
            hash_password(password)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
        ),
        None => None,
    };

    let user = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            name: input.name,
            email: input.email,
            avatar: input.avatar,
            password_hash,
        },
    )
    .await?
    .ok_or(CoreError::NotFound { entity: "user", id })?;

    Ok(Json(user.into_response()))
}

/// DELETE /api/v1/users/{id}
///
/// Hard-delete a user. Mechanic only; this is the one deliberate removal
/// path for accounts.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireMechanic(_user): RequireMechanic,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = UserRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "user", id }.into());
    }
    Ok(StatusCode::NO_CONTENT)
}
