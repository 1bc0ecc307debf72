//! Authentication and session-lifecycle primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`service`] -- register/login/refresh/logout orchestration over the
//!   session store. Returns plain data; HTTP concerns (cookies, status
//!   codes) live in the handlers.

pub mod jwt;
pub mod password;
pub mod service;

/// Failures of the authentication and session-lifecycle layer.
///
/// The HTTP mapping lives in [`crate::error::AppError`]. The 401 family
/// (`InvalidCredentials`, `SessionNotFound`, `RefreshMismatch`,
/// `RefreshExpired`, `InvalidToken`) deliberately collapses to
/// indistinguishable client messages so a caller cannot probe which internal
/// check failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration with an email that already has an account.
    #[error("email already registered")]
    DuplicateEmail,

    /// Registration input failed format validation.
    #[error("credential validation failed: {0}")]
    WeakCredential(String),

    /// Unknown email or wrong password at login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Refresh referenced a session id with no stored session (including
    /// orphaned sessions whose user no longer exists).
    #[error("session not found")]
    SessionNotFound,

    /// The presented refresh token does not match the stored one. The
    /// session is deleted before this is returned; a mismatch may mean the
    /// token was stolen and already rotated.
    #[error("refresh token mismatch")]
    RefreshMismatch,

    /// The refresh token is past its expiry. The session is deleted before
    /// this is returned.
    #[error("refresh token expired")]
    RefreshExpired,

    /// Access token failed signature, expiry, or structural validation.
    /// All three collapse here on purpose.
    #[error("invalid access token")]
    InvalidToken,

    /// A stored password hash could not be parsed. Data-integrity problem,
    /// surfaced as a 500 and error-logged.
    #[error("stored credential is corrupt")]
    CorruptCredential,
}
