use chrono::NaiveDate;

/// Snapshot of a daily mission as loaded from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissionState {
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub xp_value: i64,
}

/// What a toggle request resolved to: the new flag, the new completion date,
/// and the XP delta to apply to the user's total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub xp_delta: i64,
}

/// Resolve a mission toggle.
///
/// A mission still marked complete from an earlier day is reset instead of
/// toggled: the request flips it to incomplete with no XP change, and the
/// user has to tap again to complete it for today. The reset deliberately
/// consumes the toggle; the user's intent in that state is ambiguous.
///
/// Otherwise the flag flips normally: completing earns `xp_value`, undoing a
/// same-day completion takes it back. The delta is not clamped; the caller
/// applies it to `total_xp` verbatim.
pub fn toggle_mission(state: &MissionState, today: NaiveDate) -> ToggleOutcome {
    if state.completed && state.completed_date != Some(today) {
        return ToggleOutcome {
            completed: false,
            completed_date: None,
            xp_delta: 0,
        };
    }

    if state.completed {
        ToggleOutcome {
            completed: false,
            completed_date: None,
            xp_delta: -state.xp_value,
        }
    } else {
        ToggleOutcome {
            completed: true,
            completed_date: Some(today),
            xp_delta: state.xp_value,
        }
    }
}

/// Whether the user's missions should be presented (and persisted) as
/// incomplete because a new calendar day began since the last activity.
/// True for a user with no activity yet. Applying the reset repeatedly on
/// the same day is a no-op after the first time.
pub fn needs_daily_reset(last_active: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_active != Some(today)
}
