use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::error;

use campus_types::api::{
    Claims, MissionView, NotificationsRequest, NotificationsResponse, UserResponse,
};

use crate::auth::AppState;
use crate::error::ApiError;

/// Fetch the caller's profile with missions. The new-day mission reset is
/// applied on this read path before the response is built.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    if user_id != claims.sub {
        return Err(ApiError::Forbidden);
    }

    let today = chrono::Utc::now().date_naive();

    let db = state.clone();
    let (user, missions) =
        tokio::task::spawn_blocking(move || db.db.user_with_missions(user_id, today))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                ApiError::Internal("Fetch")
            })?
            .map_err(|e| ApiError::from_store(e, "Fetch"))?;

    let daily_missions = missions
        .into_iter()
        .map(|m| MissionView {
            id: m.id,
            name: m.mission_name,
            completed: m.completed,
            xp: m.xp_value,
        })
        .collect();

    Ok(Json(UserResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        streak: user.streak,
        total_xp: user.total_xp,
        last_active_date: user.last_active_date,
        notifications_enabled: user.notifications_enabled,
        daily_missions,
    }))
}

/// Notification preference passthrough; no engine logic.
pub async fn update_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NotificationsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if user_id != claims.sub {
        return Err(ApiError::Forbidden);
    }

    state
        .db
        .set_notifications(user_id, req.enabled)
        .map_err(|e| ApiError::from_store(e, "Update"))?;

    Ok(Json(NotificationsResponse {
        notifications_enabled: req.enabled,
    }))
}
