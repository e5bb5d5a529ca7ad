use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use campus_types::api::{Claims, ToggleMissionRequest, ToggleMissionResponse};

use crate::auth::AppState;
use crate::error::ApiError;

/// Toggle a daily mission. A completion left over from an earlier day is
/// reset by this request instead of toggled (xp_earned = 0 in that case).
pub async fn toggle_mission(
    State(state): State<AppState>,
    Path(mission_id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ToggleMissionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.user_id != claims.sub {
        return Err(ApiError::Forbidden);
    }

    let today = chrono::Utc::now().date_naive();

    let result = state
        .db
        .toggle_mission(mission_id, claims.sub, today)
        .map_err(|e| ApiError::from_store(e, "Update"))?;

    Ok(Json(ToggleMissionResponse {
        completed: result.completed,
        total_xp: result.total_xp,
        xp_earned: result.xp_delta,
    }))
}
