//! Error types for the `clublink` binary.

use clublink_api::ServerError;
use clublink_db::DbError;

use crate::config::ConfigError;

/// Top-level error for the `clublink` binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`
/// and exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be assembled.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A store operation failed.
    #[error("database error: {source}")]
    Db {
        /// The underlying store error.
        #[from]
        source: DbError,
    },

    /// The API server failed to start or stopped with an error.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: ServerError,
    },

    /// The live schema is missing tables or enum types.
    #[error("schema incomplete, missing: {missing}")]
    IncompleteSchema {
        /// Comma-separated names of what is missing.
        missing: String,
    },
}
