//! Error types for the data layer.
//!
//! Every store operation returns [`DbError`]. Raw [`sqlx::Error`] values are
//! classified on conversion: constraint breaches reported by `PostgreSQL`
//! become [`DbError::ConstraintViolation`], transport failures become
//! [`DbError::Connectivity`], and everything else is kept as
//! [`DbError::Postgres`].

use std::fmt::Display;

use sqlx::error::ErrorKind;

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Input failed field validation before reaching the database.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A uniqueness, foreign-key, check or not-null constraint rejected the
    /// write, or a business rule enforced by a store did.
    #[error("constraint violation ({constraint}): {message}")]
    ConstraintViolation {
        /// Name of the constraint that fired.
        constraint: String,
        /// Human-readable description from the server.
        message: String,
    },

    /// The addressed row does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity kind, e.g. `user`.
        entity: &'static str,
        /// The identifier that was looked up.
        key: String,
    },

    /// The database could not be reached.
    #[error("database unavailable: {0}")]
    Connectivity(String),

    /// Any other `PostgreSQL` operation failure.
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be mapped back into its Rust type.
    #[error("decode error: {0}")]
    Decode(String),

    /// A query returned a shape that should be impossible.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Shorthand for [`DbError::NotFound`].
    pub fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Shorthand for a [`DbError::ConstraintViolation`] raised by a store.
    pub fn constraint(constraint: &str, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            constraint: constraint.to_owned(),
            message: message.into(),
        }
    }

    /// Whether this is a [`DbError::NotFound`].
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is a [`DbError::ConstraintViolation`].
    pub const fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let kind = db_err.kind();
                if matches!(
                    kind,
                    ErrorKind::UniqueViolation
                        | ErrorKind::ForeignKeyViolation
                        | ErrorKind::NotNullViolation
                        | ErrorKind::CheckViolation
                ) {
                    Self::ConstraintViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_owned(),
                        message: db_err.message().to_owned(),
                    }
                } else {
                    Self::Postgres(sqlx::Error::Database(db_err))
                }
            }
            sqlx::Error::PoolTimedOut => {
                Self::Connectivity("timed out acquiring a connection".to_owned())
            }
            sqlx::Error::PoolClosed => Self::Connectivity("connection pool is closed".to_owned()),
            sqlx::Error::Io(e) => Self::Connectivity(format!("I/O error: {e}")),
            sqlx::Error::Tls(e) => Self::Connectivity(format!("TLS error: {e}")),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::Decode(format!("column {index}: {source}"))
            }
            other => Self::Postgres(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_connectivity() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::Connectivity(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::Connectivity(_)
        ));
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(matches!(
            DbError::from(sqlx::Error::Io(io)),
            DbError::Connectivity(_)
        ));
    }

    #[test]
    fn other_errors_stay_postgres() {
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Postgres(_)
        ));
    }

    #[test]
    fn not_found_formats_entity_and_key() {
        let err = DbError::not_found("user", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "user not found: abc");
    }
}
