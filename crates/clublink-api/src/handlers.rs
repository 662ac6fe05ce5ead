//! REST endpoint handlers.
//!
//! Every handler returns the JSON success envelope
//! `{ "success": true, "data"?, "count"?, "message"? }` or an [`ApiError`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Database round-trip |
//! | `POST` | `/api/migrate` | Apply embedded migrations |
//! | `GET` | `/api/users` | List users (`?role=`, `?email=`, `?limit=`) |
//! | `POST` | `/api/users` | Create a user |
//! | `PUT` | `/api/users?id=` | Update a user |
//! | `DELETE` | `/api/users?id=` | Delete a user |
//! | `GET` | `/api/users/{id}` | Get a user |
//! | `PUT` | `/api/users/{id}` | Update a user |
//! | `DELETE` | `/api/users/{id}` | Delete a user |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use clublink_db::DbError;
use clublink_types::{NewUser, User, UserFilter, UserId, UserPatch};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Envelope and query structs
// ---------------------------------------------------------------------------

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Number of items, for list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Human-readable outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    const fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            message: None,
        }
    }

    fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl ApiResponse<()> {
    fn message(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            message: Some(message.to_owned()),
        }
    }
}

/// Query parameters carrying the target of a collection-level `PUT`/`DELETE`.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    /// The user ID.
    pub id: Option<String>,
}

fn parse_user_id(raw: Option<&str>) -> Result<UserId, ApiError> {
    let raw = raw
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(String::from("User ID is required")))?;
    raw.trim()
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid user ID '{raw}': {e}")))
}

// ---------------------------------------------------------------------------
// Health and migrations
// ---------------------------------------------------------------------------

/// `SELECT 1` against the pool.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.db.ping().await?;
    Ok(Json(ApiResponse::message("Database connection healthy")))
}

/// Apply pending embedded migrations.
pub async fn migrate(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    tracing::info!("Running migrations via API");
    state.db.run_migrations().await?;
    Ok(Json(ApiResponse::message(
        "Database migration completed successfully",
    )))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// List users, optionally filtered.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<UserFilter>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(filter) = filter?;
    let users = state.db.users().list(&filter).await?;
    let count = users.len();
    Ok(Json(ApiResponse {
        success: true,
        data: Some(users),
        count: Some(count),
        message: None,
    }))
}

/// Create a user. Responds `201 Created`.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let user = state.db.users().create(&input).await?;
    tracing::info!(user_id = %user.id, "User created via API");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(user).with_message("User created successfully")),
    ))
}

/// Get one user by path ID.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw) = id?;
    let id = parse_user_id(Some(&raw))?;
    let user = state
        .db
        .users()
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))?;
    Ok(Json(ApiResponse::data(user)))
}

async fn apply_update(
    state: &AppState,
    id: UserId,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let Json(patch) = payload?;
    let user = state.db.users().update(id, &patch).await?;
    Ok(Json(
        ApiResponse::data(user).with_message("User updated successfully"),
    ))
}

async fn apply_delete(state: &AppState, id: UserId) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state.db.users().delete(id).await?;
    tracing::info!(user_id = %user.id, "User deleted via API");
    Ok(Json(
        ApiResponse::data(user).with_message("User deleted successfully"),
    ))
}

/// Update the user named by `?id=`.
pub async fn update_user_by_query(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let id = parse_user_id(query.id.as_deref())?;
    apply_update(&state, id, payload).await
}

/// Update the user named in the path.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw) = id?;
    let id = parse_user_id(Some(&raw))?;
    apply_update(&state, id, payload).await
}

/// Delete the user named by `?id=`.
pub async fn delete_user_by_query(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let id = parse_user_id(query.id.as_deref())?;
    apply_delete(&state, id).await
}

/// Delete the user named in the path.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(raw) = id?;
    let id = parse_user_id(Some(&raw))?;
    apply_delete(&state, id).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_id_is_required() {
        for raw in [None, Some(""), Some("   ")] {
            match parse_user_id(raw) {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, "User ID is required"),
                other => panic!("expected bad request, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_id_is_bad_request() {
        assert!(matches!(
            parse_user_id(Some("not-a-uuid")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn valid_id_parses() {
        let id = UserId::new();
        assert_eq!(parse_user_id(Some(&id.to_string())).unwrap(), id);
    }

    #[test]
    fn envelope_skips_absent_fields() {
        let json = serde_json::to_value(ApiResponse::message("ok")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "message": "ok" }));
    }
}
