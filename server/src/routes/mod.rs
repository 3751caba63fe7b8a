//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API, the live websocket, and the static
//! picture directory under a single Axum router. Every `/api` route except
//! register/login requires a session.

pub mod auth;
pub mod exercises;
pub mod templates;
pub mod users;
pub mod workouts;
pub mod ws;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Error half of API handler results: status plus a client-facing message.
pub(crate) type ApiError = (StatusCode, String);

/// Build an [`ApiError`]. Server-side failures are logged and their detail
/// withheld from the response body.
pub(crate) fn api_error(status: StatusCode, err: &dyn std::fmt::Display) -> ApiError {
    if status.is_server_error() {
        tracing::error!(error = %err, %status, "request failed");
        return (status, "internal error".to_owned());
    }
    (status, err.to_string())
}

/// Full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let picture_limit = state.config.max_picture_bytes;
    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .route("/auth/github", get(auth::github_redirect))
        .route("/auth/github/callback", get(auth::github_callback))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/reauthenticate", post(auth::reauthenticate))
        .route("/api/auth/ws-ticket", post(auth::ws_ticket))
        .route("/api/workouts", get(workouts::list_workouts).post(workouts::create_workout))
        .route("/api/workouts/{id}", get(workouts::get_workout))
        .route("/api/exercises", get(exercises::list_exercises).post(exercises::create_exercise))
        .route("/api/exercises/{id}", axum::routing::delete(exercises::delete_exercise))
        .route("/api/templates", get(templates::list_templates).post(templates::create_template))
        .route(
            "/api/templates/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/api/users/me", patch(users::update_me).delete(users::delete_me))
        .route(
            "/api/users/me/picture",
            put(users::put_picture).layer(DefaultBodyLimit::max(picture_limit.saturating_add(1))),
        )
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .nest_service("/uploads", uploads)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
