pub mod auth;
pub mod checkin;
pub mod error;
pub mod middleware;
pub mod missions;
pub mod users;

pub use auth::{AppState, AppStateInner};

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, patch, post},
};

/// Build the API router. Public auth/health routes plus the JWT-protected
/// user surface; the caller layers CORS/tracing on top.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/health", get(health))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/checkin", post(checkin::check_in))
        .route("/api/mission/{mission_id}/toggle", post(missions::toggle_mission))
        .route("/api/user/{user_id}", get(users::get_user))
        .route("/api/user/{user_id}/notifications", patch(users::update_notifications))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
