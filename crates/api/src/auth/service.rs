//! Session-lifecycle orchestration: register, login, refresh, logout.
//!
//! Per-session state machine: `Active -> Rotated -> Active` on refresh,
//! `-> Revoked` (deleted) on logout or failed refresh. Expiry is never
//! materialized as a state; it is checked lazily at validation time.
//!
//! These functions return plain data and speak no HTTP; cookie and status
//! handling belongs to the handlers in [`crate::handlers::auth`].

use chrono::{Duration, Utc};
use sqlx::PgPool;

use autolog_core::roles::{is_valid_role, ROLE_MECHANIC};
use autolog_core::status::USER_STATUS_SUSPENDED;
use autolog_core::error::CoreError;
use autolog_core::types::DbId;
use autolog_db::models::session::{CreateSession, RotateSession, UserSession};
use autolog_db::models::user::{CreateUser, User};
use autolog_db::repositories::{SessionRepo, UserRepo};

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, hash_refresh_token, JwtConfig,
};
use crate::auth::password::{dummy_verify, hash_password, verify_password};
use crate::auth::AuthError;
use crate::error::{AppError, AppResult};

/// Validated registration input. Field format checks happen at the HTTP
/// boundary; this layer owns the uniqueness and role rules.
#[derive(Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// A freshly created or rotated session together with the plaintext tokens
/// to hand to the client. The refresh plaintext exists only here; the store
/// keeps its hash.
#[derive(Debug)]
pub struct AuthenticatedSession {
    pub session: UserSession,
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Create a user account.
///
/// Fails with [`AuthError::DuplicateEmail`] when the email is taken. The
/// role defaults to `mechanic` when omitted; see DESIGN.md for why this
/// default is preserved rather than flipped to the least-privileged role.
pub async fn register(pool: &PgPool, input: NewUser) -> AppResult<User> {
    let role = input.role.unwrap_or_else(|| ROLE_MECHANIC.to_string());
    if !is_valid_role(&role) {
        return Err(CoreError::Validation(format!("Unknown role: {role}")).into());
    }

    if UserRepo::find_by_email(pool, &input.email).await?.is_some() {
        return Err(AuthError::DuplicateEmail.into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    // A concurrent registration racing past the lookup above still loses at
    // the uq_users_email constraint, which surfaces as a 409.
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, "Registered new user");
    Ok(user)
}

/// Authenticate with email + password and open a fresh session.
///
/// Unknown email and wrong password collapse to the same error, and the
/// unknown-email path runs a dummy hash verification so the two are not
/// separable by timing. The password is always verified before the account
/// status is consulted: the suspended 403 is only ever shown to a caller
/// who proved they hold the credentials. Any prior sessions for the user
/// are deleted first: one active session per user, no concurrent-device
/// support.
pub async fn login(
    pool: &PgPool,
    jwt: &JwtConfig,
    email: &str,
    password: &str,
) -> AppResult<AuthenticatedSession> {
    let Some(user) = UserRepo::find_by_email(pool, email).await? else {
        dummy_verify(password);
        return Err(AuthError::InvalidCredentials.into());
    };

    let password_valid = verify_password(password, &user.password_hash)
        .map_err(|_| AuthError::CorruptCredential)?;
    if !password_valid {
        return Err(AuthError::InvalidCredentials.into());
    }

    if user.status == USER_STATUS_SUSPENDED {
        return Err(CoreError::Forbidden("Account is suspended".into()).into());
    }

    let revoked = SessionRepo::delete_all_for_user(pool, user.id).await?;
    if revoked > 0 {
        tracing::debug!(user_id = user.id, revoked, "Replaced existing session on login");
    }

    let (access_token, refresh_token, session) = open_session(pool, jwt, &user).await?;

    Ok(AuthenticatedSession {
        session,
        access_token,
        refresh_token,
        user,
    })
}

/// Exchange a session id + refresh token for a rotated token pair.
///
/// Every failure except a transient database error is terminal for the
/// session: mismatch, expiry, and an orphaned user all delete the session
/// row, forcing a fresh login. Rotation is full replacement -- the old
/// refresh token can never be used again.
pub async fn refresh(
    pool: &PgPool,
    jwt: &JwtConfig,
    session_id: DbId,
    refresh_token: &str,
) -> AppResult<AuthenticatedSession> {
    let Some(session) = SessionRepo::find_by_id(pool, session_id).await? else {
        return Err(AuthError::SessionNotFound.into());
    };

    // Orphaned session: the owning user is gone, so the session is invalid,
    // not an error in the store.
    let Some(user) = UserRepo::find_by_id(pool, session.user_id).await? else {
        SessionRepo::delete(pool, session.id).await?;
        return Err(AuthError::SessionNotFound.into());
    };

    if user.status == USER_STATUS_SUSPENDED {
        SessionRepo::delete(pool, session.id).await?;
        return Err(CoreError::Forbidden("Account is suspended".into()).into());
    }

    if hash_refresh_token(refresh_token) != session.refresh_token_hash {
        // Possible token theft: the session is destroyed rather than
        // repaired, so even the legitimate holder must log in again.
        SessionRepo::delete(pool, session.id).await?;
        tracing::warn!(
            session_id = session.id,
            user_id = session.user_id,
            "Refresh token mismatch, session revoked"
        );
        return Err(AuthError::RefreshMismatch.into());
    }

    if session.refresh_token_expires_at <= Utc::now() {
        SessionRepo::delete(pool, session.id).await?;
        return Err(AuthError::RefreshExpired.into());
    }

    let access_token = generate_access_token(user.id, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let now = Utc::now();

    let rotated = SessionRepo::rotate(
        pool,
        session.id,
        &session.refresh_token_hash,
        &RotateSession {
            refresh_token_hash: refresh_hash,
            access_token_expires_at: now + Duration::minutes(jwt.access_token_expiry_mins),
            refresh_token_expires_at: now + Duration::days(jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    // The compare-and-swap lost to a concurrent rotation: the hash we
    // fetched is no longer current, which is indistinguishable from replay.
    let Some(rotated) = rotated else {
        SessionRepo::delete(pool, session.id).await?;
        return Err(AuthError::RefreshMismatch.into());
    };

    Ok(AuthenticatedSession {
        session: rotated,
        access_token,
        refresh_token: refresh_plaintext,
        user,
    })
}

/// Delete a session. Idempotent: logging out an already-gone session is
/// not an error.
pub async fn logout(pool: &PgPool, session_id: DbId) -> AppResult<()> {
    SessionRepo::delete(pool, session_id).await?;
    Ok(())
}

/// Mint a token pair and persist the session row for `user`.
async fn open_session(
    pool: &PgPool,
    jwt: &JwtConfig,
    user: &User,
) -> AppResult<(String, String, UserSession)> {
    let access_token = generate_access_token(user.id, &user.role, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();
    let now = Utc::now();

    let session = SessionRepo::create(
        pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            access_token_expires_at: now + Duration::minutes(jwt.access_token_expiry_mins),
            refresh_token_expires_at: now + Duration::days(jwt.refresh_token_expiry_days),
        },
    )
    .await?;

    Ok((access_token, refresh_plaintext, session))
}
