//! Repository for the `user_sessions` table.
//!
//! Session expiry is never materialized as a state change; it is checked
//! lazily by the callers against the stored expiry columns.

use autolog_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, RotateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, refresh_token_hash, access_token_expires_at, \
                        refresh_token_expires_at, created_at, updated_at";

/// Provides CRUD operations for user sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions
                (user_id, refresh_token_hash, access_token_expires_at, refresh_token_expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.access_token_expires_at)
            .bind(input.refresh_token_expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a session by its id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE id = $1");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace a session's token pair and expiries in a single atomic update.
    ///
    /// The update is keyed on `(id, refresh_token_hash)` so that two refreshes
    /// racing on the same session cannot both win: the loser sees `None`
    /// because the hash it fetched has already been replaced.
    pub async fn rotate(
        pool: &PgPool,
        id: DbId,
        current_hash: &str,
        input: &RotateSession,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET
                refresh_token_hash = $3,
                access_token_expires_at = $4,
                refresh_token_expires_at = $5,
                updated_at = NOW()
             WHERE id = $1 AND refresh_token_hash = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .bind(current_hash)
            .bind(&input.refresh_token_hash)
            .bind(input.access_token_expires_at)
            .bind(input.refresh_token_expires_at)
            .fetch_optional(pool)
            .await
    }

    /// Delete a single session. Returns `true` if a row was removed.
    ///
    /// Deleting an absent session is not an error; logout is idempotent.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session held by a user. Returns the count of removed rows.
    ///
    /// Called on login to enforce the single-active-session-per-user rule.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
