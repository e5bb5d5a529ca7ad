//! Database row types — these map directly to SQLite rows.
//! Distinct from campus-types API models to keep the DB layer independent.

use chrono::NaiveDate;

pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub streak: u32,
    pub total_xp: i64,
    pub last_active_date: Option<NaiveDate>,
    pub notifications_enabled: bool,
    pub created_at: String,
}

pub struct MissionRow {
    pub id: i64,
    pub user_id: i64,
    pub mission_name: String,
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub xp_value: i64,
}

/// Result of a committed check-in transaction.
#[derive(Debug)]
pub struct CheckinOutcome {
    pub streak: u32,
    pub total_xp: i64,
    pub last_active_date: NaiveDate,
}

/// Result of a committed mission toggle transaction.
#[derive(Debug)]
pub struct ToggleResult {
    pub completed: bool,
    pub total_xp: i64,
    pub xp_delta: i64,
}
