//! Pure decision logic for streaks and daily missions.
//!
//! Everything here is a stateless function over calendar dates: the caller
//! loads state, asks the engine what the next state should be, and persists
//! the answer. Date comparisons are calendar-day granularity; "today" is
//! always resolved by the caller from the server clock at processing time.

pub mod missions;
pub mod streak;

pub use missions::{MissionState, ToggleOutcome, needs_daily_reset, toggle_mission};
pub use streak::streak_after_checkin;

/// XP granted by every daily check-in.
pub const CHECKIN_XP: i64 = 10;
