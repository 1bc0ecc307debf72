use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: autolog_db::DbPool,
    /// Server configuration, read-only after startup. The JWT signing secret
    /// lives here and is passed explicitly wherever tokens are minted or
    /// checked; there is no process-wide mutable secret.
    pub config: Arc<ServerConfig>,
}
