//! Error types for the Club Link API server.
//!
//! [`ApiError`] unifies store failures and malformed requests into a single
//! enum that converts into the JSON failure envelope via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation:
//!
//! ```json
//! { "success": false, "error": "User not found", "details": null }
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use clublink_db::DbError;
use serde_json::Value;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A store operation failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// The request was malformed (missing parameter, bad ID, unreadable body).
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Db(DbError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Db(DbError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Db(DbError::ConstraintViolation { .. }) => StatusCode::CONFLICT,
            Self::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `error` message and optional `details` of the envelope.
    fn message_and_details(&self) -> (String, Value) {
        match self {
            Self::BadRequest(msg) => (msg.clone(), Value::Null),
            Self::Db(DbError::Validation(errors)) => (
                String::from("Validation error"),
                serde_json::to_value(errors).unwrap_or(Value::Null),
            ),
            Self::Db(DbError::NotFound { entity, .. }) => {
                (format!("{} not found", capitalize(entity)), Value::Null)
            }
            Self::Db(DbError::ConstraintViolation {
                constraint,
                message,
            }) => (
                String::from("Constraint violation"),
                serde_json::json!({ "constraint": constraint, "message": message }),
            ),
            Self::Db(e) => (
                String::from("Database operation failed"),
                Value::String(e.to_string()),
            ),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let (message, details) = self.message_and_details();
        let body = serde_json::json!({
            "success": false,
            "error": message,
            "details": details,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::BadRequest("x".to_owned()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Db(DbError::not_found("user", "abc")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Db(DbError::constraint("users_email_key", "duplicate")).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Db(DbError::Connectivity("refused".to_owned())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Db(DbError::Validation(validator::ValidationErrors::new())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let (message, details) =
            ApiError::Db(DbError::not_found("gym owner", "abc")).message_and_details();
        assert_eq!(message, "Gym owner not found");
        assert!(details.is_null());
    }

    #[test]
    fn constraint_details_carry_the_constraint_name() {
        let (_, details) = ApiError::Db(DbError::constraint("users_email_key", "duplicate key"))
            .message_and_details();
        assert_eq!(details["constraint"], "users_email_key");
        assert_eq!(details["message"], "duplicate key");
    }

    #[test]
    fn capitalize_handles_empty() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("user"), "User");
    }
}
