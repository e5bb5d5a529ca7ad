use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use campus_engine::{self as engine, CHECKIN_XP, MissionState};

use crate::models::{CheckinOutcome, MissionRow, ToggleResult, UserRow};
use crate::{Database, Result, StoreError};

/// Missions every new account starts with.
pub const DEFAULT_MISSIONS: [&str; 3] = [
    "Attended lectures today",
    "Read something today",
    "Didn't skip class",
];

pub const DEFAULT_MISSION_XP: i64 = 5;

impl Database {
    // -- Users --

    pub fn create_user(&self, email: &str, username: &str, password_hash: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (email, username, password_hash) VALUES (?1, ?2, ?3)",
                (email, username, password_hash),
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::AccountExists
                } else {
                    e.into()
                }
            })?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Seed the fixed set of daily missions for a fresh account. Applied
    /// once at registration, after the user row commits; a failure here is
    /// not rolled back against the user row.
    pub fn seed_missions(&self, user_id: i64) -> Result<()> {
        self.with_conn_mut(|conn| {
            for name in DEFAULT_MISSIONS {
                conn.execute(
                    "INSERT INTO daily_missions (user_id, mission_name, xp_value) VALUES (?1, ?2, ?3)",
                    (user_id, name, DEFAULT_MISSION_XP),
                )?;
            }
            Ok(())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email = ?1", &[&email]))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", &[&id]))
    }

    pub fn set_notifications(&self, user_id: i64, enabled: bool) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET notifications_enabled = ?1 WHERE id = ?2",
                (enabled, user_id),
            )?;
            Ok(())
        })
    }

    // -- Check-in --

    /// Record today's check-in and recompute the streak, all in one
    /// transaction. The duplicate guard on `last_active_date` plus the
    /// UNIQUE(user_id, checkin_date) constraint keep two racing requests
    /// from both committing.
    pub fn check_in(&self, user_id: i64, today: NaiveDate) -> Result<CheckinOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let user = query_user(&tx, "id = ?1", &[&user_id])?
                .ok_or(StoreError::UserNotFound)?;

            if user.last_active_date == Some(today) {
                return Err(StoreError::DuplicateCheckin);
            }

            tx.execute(
                "INSERT INTO checkin_history (user_id, checkin_date, xp_earned) VALUES (?1, ?2, ?3)",
                (user_id, today, CHECKIN_XP),
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateCheckin
                } else {
                    e.into()
                }
            })?;

            let history = query_checkin_dates(&tx, user_id)?;
            let streak = engine::streak_after_checkin(&history, user.last_active_date, today);
            let total_xp = user.total_xp + CHECKIN_XP;

            tx.execute(
                "UPDATE users SET streak = ?1, total_xp = ?2, last_active_date = ?3 WHERE id = ?4",
                (streak, total_xp, today, user_id),
            )?;

            tx.commit()?;
            Ok(CheckinOutcome {
                streak,
                total_xp,
                last_active_date: today,
            })
        })
    }

    // -- Missions --

    /// Toggle a mission and apply the XP delta to its owner, in one
    /// transaction. The toggle semantics (stale-day reset vs normal flip)
    /// live in the engine; this only persists the outcome.
    pub fn toggle_mission(
        &self,
        mission_id: i64,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<ToggleResult> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let mission = query_mission(&tx, mission_id, user_id)?
                .ok_or(StoreError::MissionNotFound)?;

            let outcome = engine::toggle_mission(
                &MissionState {
                    completed: mission.completed,
                    completed_date: mission.completed_date,
                    xp_value: mission.xp_value,
                },
                today,
            );

            tx.execute(
                "UPDATE daily_missions SET completed = ?1, completed_date = ?2 WHERE id = ?3",
                (outcome.completed, outcome.completed_date, mission_id),
            )?;

            // Unclamped on purpose: the engine never clamps XP below zero.
            tx.execute(
                "UPDATE users SET total_xp = total_xp + ?1 WHERE id = ?2",
                (outcome.xp_delta, user_id),
            )?;

            let total_xp: i64 = tx.query_row(
                "SELECT total_xp FROM users WHERE id = ?1",
                [user_id],
                |row| row.get(0),
            )?;

            tx.commit()?;
            Ok(ToggleResult {
                completed: outcome.completed,
                total_xp,
                xp_delta: outcome.xp_delta,
            })
        })
    }

    /// Load a user together with their missions, applying the new-day reset
    /// on the read path: on the first fetch of a new calendar day every
    /// mission is persisted back to incomplete (completion dates untouched,
    /// XP untouched). Repeating the reset on the same day is a no-op.
    pub fn user_with_missions(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<(UserRow, Vec<MissionRow>)> {
        self.with_conn_mut(|conn| {
            let user = query_user(conn, "id = ?1", &[&user_id])?
                .ok_or(StoreError::UserNotFound)?;

            let mut missions = query_missions(conn, user_id)?;

            if engine::needs_daily_reset(user.last_active_date, today) {
                conn.execute(
                    "UPDATE daily_missions SET completed = 0 WHERE user_id = ?1",
                    [user_id],
                )?;
                for m in &mut missions {
                    m.completed = false;
                }
            }

            Ok((user, missions))
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn query_user(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::types::ToSql],
) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, email, username, password_hash, streak, total_xp,
                last_active_date, notifications_enabled, created_at
         FROM users WHERE {filter}"
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row(params, |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                username: row.get(2)?,
                password_hash: row.get(3)?,
                streak: row.get(4)?,
                total_xp: row.get(5)?,
                last_active_date: row.get(6)?,
                notifications_enabled: row.get(7)?,
                created_at: row.get(8)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_mission(conn: &Connection, mission_id: i64, user_id: i64) -> Result<Option<MissionRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, mission_name, completed, completed_date, xp_value
         FROM daily_missions WHERE id = ?1 AND user_id = ?2",
    )?;

    let row = stmt
        .query_row((mission_id, user_id), map_mission_row)
        .optional()?;

    Ok(row)
}

fn query_missions(conn: &Connection, user_id: i64) -> Result<Vec<MissionRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, mission_name, completed, completed_date, xp_value
         FROM daily_missions WHERE user_id = ?1 ORDER BY id",
    )?;

    let rows = stmt
        .query_map([user_id], map_mission_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_mission_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MissionRow> {
    Ok(MissionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        mission_name: row.get(2)?,
        completed: row.get(3)?,
        completed_date: row.get(4)?,
        xp_value: row.get(5)?,
    })
}

fn query_checkin_dates(conn: &Connection, user_id: i64) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare(
        "SELECT checkin_date FROM checkin_history WHERE user_id = ?1 ORDER BY checkin_date DESC",
    )?;

    let dates = stmt
        .query_map([user_id], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let user_id = db.create_user("a@campus.edu", "alice", "hash").unwrap();
        db.seed_missions(user_id).unwrap();
        (db, user_id)
    }

    fn backdate_checkin(db: &Database, user_id: i64, date: NaiveDate) {
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO checkin_history (user_id, checkin_date) VALUES (?1, ?2)",
                (user_id, date),
            )?;
            Ok(())
        })
        .unwrap();
    }

    fn set_last_active(db: &Database, user_id: i64, date: NaiveDate) {
        db.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET last_active_date = ?1 WHERE id = ?2",
                (date, user_id),
            )?;
            Ok(())
        })
        .unwrap();
    }

    fn today() -> NaiveDate {
        "2025-03-10".parse().unwrap()
    }

    #[test]
    fn registration_seeds_three_missions() {
        let (db, user_id) = setup();
        let (user, missions) = db.user_with_missions(user_id, today()).unwrap();
        assert_eq!(user.streak, 0);
        assert_eq!(user.total_xp, 0);
        assert_eq!(missions.len(), 3);
        assert!(missions.iter().all(|m| !m.completed && m.xp_value == 5));
        let names: Vec<&str> = missions.iter().map(|m| m.mission_name.as_str()).collect();
        assert_eq!(names, DEFAULT_MISSIONS);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let (db, _) = setup();
        let err = db.create_user("a@campus.edu", "bob", "hash").unwrap_err();
        assert!(matches!(err, StoreError::AccountExists));
    }

    #[test]
    fn first_checkin_starts_streak_at_one() {
        let (db, user_id) = setup();
        let out = db.check_in(user_id, today()).unwrap();
        assert_eq!(out.streak, 1);
        assert_eq!(out.total_xp, 10);
        assert_eq!(out.last_active_date, today());
    }

    #[test]
    fn second_checkin_same_day_is_rejected_without_state_change() {
        let (db, user_id) = setup();
        db.check_in(user_id, today()).unwrap();
        let err = db.check_in(user_id, today()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateCheckin));

        let user = db.get_user_by_id(user_id).unwrap().unwrap();
        assert_eq!(user.total_xp, 10);
        assert_eq!(user.streak, 1);
    }

    #[test]
    fn consecutive_days_grow_the_streak() {
        let (db, user_id) = setup();
        let t = today();
        for n in (1..=4).rev() {
            backdate_checkin(&db, user_id, t.checked_sub_days(Days::new(n)).unwrap());
        }
        set_last_active(&db, user_id, t.pred_opt().unwrap());

        let out = db.check_in(user_id, t).unwrap();
        assert_eq!(out.streak, 5);
    }

    #[test]
    fn gap_resets_streak_to_one() {
        let (db, user_id) = setup();
        let t = today();
        // Old unbroken history, but last activity was 3 days ago.
        for n in 3..=6 {
            backdate_checkin(&db, user_id, t.checked_sub_days(Days::new(n)).unwrap());
        }
        set_last_active(&db, user_id, t.checked_sub_days(Days::new(3)).unwrap());

        let out = db.check_in(user_id, t).unwrap();
        assert_eq!(out.streak, 1);
    }

    #[test]
    fn checkin_unknown_user() {
        let (db, _) = setup();
        let err = db.check_in(999, today()).unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound));
    }

    #[test]
    fn toggle_round_trip_is_net_zero_xp() {
        let (db, user_id) = setup();
        let t = today();
        set_last_active(&db, user_id, t);
        let (_, missions) = db.user_with_missions(user_id, t).unwrap();
        let mission_id = missions[0].id;

        let first = db.toggle_mission(mission_id, user_id, t).unwrap();
        assert!(first.completed);
        assert_eq!(first.xp_delta, 5);
        assert_eq!(first.total_xp, 5);

        let second = db.toggle_mission(mission_id, user_id, t).unwrap();
        assert!(!second.completed);
        assert_eq!(second.xp_delta, -5);
        assert_eq!(second.total_xp, 0);
    }

    #[test]
    fn stale_completion_resets_with_no_xp_change() {
        let (db, user_id) = setup();
        let t = today();
        let yesterday = t.pred_opt().unwrap();
        set_last_active(&db, user_id, t);
        let (_, missions) = db.user_with_missions(user_id, t).unwrap();
        let mission_id = missions[0].id;

        db.toggle_mission(mission_id, user_id, yesterday).unwrap();
        let out = db.toggle_mission(mission_id, user_id, t).unwrap();
        assert!(!out.completed);
        assert_eq!(out.xp_delta, 0);
        assert_eq!(out.total_xp, 5);
    }

    #[test]
    fn toggle_wrong_owner_is_not_found() {
        let (db, user_id) = setup();
        let other = db.create_user("b@campus.edu", "bob", "hash").unwrap();
        db.seed_missions(other).unwrap();
        let (_, missions) = db.user_with_missions(user_id, today()).unwrap();

        let err = db
            .toggle_mission(missions[0].id, other, today())
            .unwrap_err();
        assert!(matches!(err, StoreError::MissionNotFound));
    }

    #[test]
    fn new_day_fetch_resets_missions_idempotently() {
        let (db, user_id) = setup();
        let t = today();
        let yesterday = t.pred_opt().unwrap();
        set_last_active(&db, user_id, yesterday);
        db.toggle_mission(1, user_id, yesterday).unwrap();

        let (_, missions) = db.user_with_missions(user_id, t).unwrap();
        assert!(missions.iter().all(|m| !m.completed));

        // Second fetch on the same day: identical result, XP untouched.
        let (user, missions) = db.user_with_missions(user_id, t).unwrap();
        assert!(missions.iter().all(|m| !m.completed));
        assert_eq!(user.total_xp, 5);
    }

    #[test]
    fn same_day_fetch_keeps_completions() {
        let (db, user_id) = setup();
        let t = today();
        set_last_active(&db, user_id, t);
        db.toggle_mission(1, user_id, t).unwrap();

        let (_, missions) = db.user_with_missions(user_id, t).unwrap();
        assert!(missions.iter().any(|m| m.completed));
    }

    #[test]
    fn deleting_user_cascades_to_missions_and_history() {
        let (db, user_id) = setup();
        db.check_in(user_id, today()).unwrap();

        db.with_conn(|conn| {
            conn.execute("DELETE FROM users WHERE id = ?1", [user_id])?;
            let missions: i64 = conn.query_row(
                "SELECT COUNT(*) FROM daily_missions WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            let checkins: i64 = conn.query_row(
                "SELECT COUNT(*) FROM checkin_history WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            assert_eq!(missions, 0);
            assert_eq!(checkins, 0);
            Ok(())
        })
        .unwrap();
    }
}
