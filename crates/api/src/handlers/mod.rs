//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers delegate to `autolog_db` repositories and the auth service, and
//! map errors via [`crate::error::AppError`].

pub mod auth;
pub mod cars;
pub mod users;
