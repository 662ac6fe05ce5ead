//! Shared application state for the API server.

use clublink_db::PostgresPool;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. The pool is opened once by the caller and handed in here.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool for every store operation.
    pub db: PostgresPool,
}

impl AppState {
    /// Create application state around an open pool.
    pub const fn new(db: PostgresPool) -> Self {
        Self { db }
    }
}
