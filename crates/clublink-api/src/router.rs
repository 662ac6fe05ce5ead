//! Axum router construction for the API.
//!
//! Assembles all routes into a single [`Router`] with CORS and request
//! tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /api/health` -- database round-trip
/// - `POST /api/migrate` -- apply embedded migrations
/// - `GET|POST|PUT|DELETE /api/users` -- users collection (`PUT`/`DELETE` take `?id=`)
/// - `GET|PUT|DELETE /api/users/{id}` -- single user
///
/// CORS allows any origin, method and header.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/migrate", post(handlers::migrate))
        .route(
            "/api/users",
            get(handlers::list_users)
                .post(handlers::create_user)
                .put(handlers::update_user_by_query)
                .delete(handlers::delete_user_by_query),
        )
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
