use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id                     INTEGER PRIMARY KEY AUTOINCREMENT,
            email                  TEXT NOT NULL UNIQUE,
            username               TEXT NOT NULL UNIQUE,
            password_hash          TEXT NOT NULL,
            streak                 INTEGER NOT NULL DEFAULT 0,
            total_xp               INTEGER NOT NULL DEFAULT 0,
            last_active_date       TEXT,
            notifications_enabled  INTEGER NOT NULL DEFAULT 0,
            created_at             TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS daily_missions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            mission_name    TEXT NOT NULL,
            completed       INTEGER NOT NULL DEFAULT 0,
            completed_date  TEXT,
            xp_value        INTEGER NOT NULL DEFAULT 5
        );

        CREATE INDEX IF NOT EXISTS idx_missions_user
            ON daily_missions(user_id);

        -- One ledger row per user per calendar day. The UNIQUE constraint is
        -- the serialization point for racing check-in requests.
        CREATE TABLE IF NOT EXISTS checkin_history (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            checkin_date  TEXT NOT NULL,
            xp_earned     INTEGER NOT NULL DEFAULT 10,
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, checkin_date)
        );

        CREATE INDEX IF NOT EXISTS idx_checkins_user
            ON checkin_history(user_id, checkin_date);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
