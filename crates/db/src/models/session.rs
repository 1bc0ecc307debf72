//! User session model and DTOs.
//!
//! A session row pairs a user with its currently valid token pair. Only the
//! SHA-256 digest of the refresh token is stored; the plaintext lives solely
//! in the client's cookie.

use autolog_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `user_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub access_token_expires_at: Timestamp,
    pub refresh_token_expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new session.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub access_token_expires_at: Timestamp,
    pub refresh_token_expires_at: Timestamp,
}

/// Replacement token pair applied when a session rotates on refresh.
#[derive(Debug)]
pub struct RotateSession {
    pub refresh_token_hash: String,
    pub access_token_expires_at: Timestamp,
    pub refresh_token_expires_at: Timestamp,
}
