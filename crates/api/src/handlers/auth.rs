//! Handlers for the `/auth` resource (register, login, refresh, logout).
//!
//! The session-lifecycle logic lives in [`crate::auth::service`]; this layer
//! owns the HTTP shape: request validation, cookies, and status codes. The
//! session id and refresh token are delivered as `httpOnly` cookies whose
//! expiry mirrors the refresh token's; the access token rides in the body.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use autolog_core::types::DbId;
use autolog_db::models::user::UserResponse;

use crate::auth::{service, AuthError};
use crate::cookies::{
    clear_session_cookies, extract_cookie, session_cookies, REFRESH_COOKIE, SESSION_COOKIE,
};
use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30, message = "Name must be 3 to 30 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Successful token rotation response returned by refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Flatten validator output into one human-readable line.
fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect();
    messages.sort();
    if messages.is_empty() {
        "Invalid registration input".to_string()
    } else {
        messages.join("; ")
    }
}

/// Read the session id cookie, if present and well-formed.
fn session_id_cookie(headers: &HeaderMap) -> Option<DbId> {
    extract_cookie(headers, SESSION_COOKIE).and_then(|raw| raw.parse().ok())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a user account. Returns 201 with the public user representation.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AuthError::WeakCredential(validation_message(&e)))?;

    let user = service::register(
        &state.pool,
        service::NewUser {
            name: input.name,
            email: input.email,
            password: input.password,
            role: input.role,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into_response())))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Sets the session cookies and returns
/// the access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let auth = service::login(&state.pool, &state.config.jwt, &input.email, &input.password).await?;

    let cookies = session_cookies(
        auth.session.id,
        &auth.refresh_token,
        auth.session.refresh_token_expires_at,
    );

    let body = LoginResponse {
        access_token: auth.access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: auth.user.into_response(),
    };

    Ok((
        AppendHeaders(cookies.map(|c| (SET_COOKIE, c))),
        Json(body),
    ))
}

/// POST /api/v1/auth/refresh
///
/// Rotate the session's token pair using the session cookies. A missing or
/// malformed cookie is reported exactly like an unknown session.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let session_id = session_id_cookie(&headers).ok_or(AuthError::SessionNotFound)?;
    let refresh_token =
        extract_cookie(&headers, REFRESH_COOKIE).ok_or(AuthError::SessionNotFound)?;

    let auth = service::refresh(&state.pool, &state.config.jwt, session_id, &refresh_token).await?;

    let cookies = session_cookies(
        auth.session.id,
        &auth.refresh_token,
        auth.session.refresh_token_expires_at,
    );

    let body = RefreshResponse {
        access_token: auth.access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
    };

    Ok((
        AppendHeaders(cookies.map(|c| (SET_COOKIE, c))),
        Json(body),
    ))
}

/// POST /api/v1/auth/logout
///
/// Delete the cookie-referenced session, clear the cookies, and return 204.
/// Idempotent: absent or unknown sessions are not errors.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(session_id) = session_id_cookie(&headers) {
        service::logout(&state.pool, session_id).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders(clear_session_cookies().map(|c| (SET_COOKIE, c))),
    ))
}
