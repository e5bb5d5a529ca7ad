use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::error;

use campus_engine::CHECKIN_XP;
use campus_types::api::{CheckinRequest, CheckinResponse, Claims};

use crate::auth::AppState;
use crate::error::ApiError;

/// Daily check-in: one per user per calendar day, +10 XP, streak recomputed.
/// "Today" is resolved from the server clock at processing time.
pub async fn check_in(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CheckinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.user_id != claims.sub {
        return Err(ApiError::Forbidden);
    }

    let today = chrono::Utc::now().date_naive();

    // Run the blocking check-in transaction off the async runtime
    let db = state.clone();
    let outcome = tokio::task::spawn_blocking(move || db.db.check_in(req.user_id, today))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal("Check-in")
        })?
        .map_err(|e| ApiError::from_store(e, "Check-in"))?;

    Ok(Json(CheckinResponse {
        streak: outcome.streak,
        total_xp: outcome.total_xp,
        last_active_date: outcome.last_active_date,
        xp_earned: CHECKIN_XP,
    }))
}
