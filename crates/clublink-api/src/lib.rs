//! HTTP API for the Club Link data store.
//!
//! An Axum server exposing a health check, a migration trigger and the
//! users collection. Every response uses the JSON envelope
//! `{ "success": bool, "data"?, "count"?, "message"?, "error"?, "details"? }`.
//!
//! # Architecture
//!
//! Handlers borrow the shared [`PostgresPool`](clublink_db::PostgresPool)
//! from [`AppState`] and call the store directly. Store errors map to HTTP
//! status codes in [`ApiError`]: validation 400, missing row 404,
//! constraint violation 409, everything else 500.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
