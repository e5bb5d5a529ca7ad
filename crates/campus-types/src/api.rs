use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims used by campus-api's auth middleware and token issuance.
/// Canonical definition lives here so handlers and tests share one type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: i64,
}

// -- Check-in --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckinRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckinResponse {
    pub streak: u32,
    pub total_xp: i64,
    pub last_active_date: NaiveDate,
    pub xp_earned: i64,
}

// -- Missions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToggleMissionRequest {
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleMissionResponse {
    pub completed: bool,
    pub total_xp: i64,
    /// Signed delta: +xp on completion, -xp on undo, 0 on a stale-day reset.
    pub xp_earned: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionView {
    pub id: i64,
    pub name: String,
    pub completed: bool,
    pub xp: i64,
}

// -- User --

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub streak: u32,
    pub total_xp: i64,
    pub last_active_date: Option<NaiveDate>,
    pub notifications_enabled: bool,
    pub daily_missions: Vec<MissionView>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationsRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications_enabled: bool,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
