//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use autolog_core::error::CoreError;
use autolog_core::status::USER_STATUS_SUSPENDED;
use autolog_core::types::DbId;
use autolog_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Token validation is stateless; the session store is never consulted here.
/// The referenced user IS loaded, so deleted or suspended accounts are
/// rejected even while their access token is still cryptographically valid.
/// A revoked session's access token therefore keeps working until its short
/// expiry lapses, which is the accepted tradeoff for one fewer lookup.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"mechanic"` or `"customer"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims =
            validate_token(token, &state.config.jwt).map_err(|_| AuthError::InvalidToken)?;

        // The claims are trusted for identity, not for existence: the account
        // may have been deleted or suspended since the token was minted.
        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await
            .map_err(AppError::Database)?
            .ok_or(AuthError::InvalidToken)?;

        if user.status == USER_STATUS_SUSPENDED {
            return Err(AuthError::InvalidToken.into());
        }

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
