//! SQLite persistence for the timer engine, the reward ledger and the log
//! of completed phases.
//!
//! Engine and ledger are stored as JSON blobs in a key-value table; the
//! engines stay free of SQL.

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::ledger::Ledger;
use crate::timer::{TimerEngine, TimerPhase};

/// kv key holding the serialized [`TimerEngine`].
pub const TIMER_KEY: &str = "timer_engine";
/// kv key holding the serialized [`Ledger`].
pub const LEDGER_KEY: &str = "ledger";

const SCHEMA_VERSION: i32 = 1;

/// One completed (not skipped) phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub phase: TimerPhase,
    pub mode_id: String,
    pub duration_secs: u64,
    pub completed_at: NaiveDateTime,
}

/// SQLite database for pomodore state.
///
/// Stored at `~/.config/pomodore/pomodore.db`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database in the data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("pomodore.db");
        Self::open_at(&path)
    }

    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// In-memory database for tests and dry runs.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(DatabaseError::MigrationFailed(format!(
                "database schema v{version} is newer than supported v{SCHEMA_VERSION}"
            ))
            .into());
        }

        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS sessions (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    phase         TEXT NOT NULL,
                    mode_id       TEXT NOT NULL,
                    duration_secs INTEGER NOT NULL,
                    completed_at  TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_completed_at
                    ON sessions(completed_at);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        self.conn
            .pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    // ── Key-value ────────────────────────────────────────────────────

    /// Get a value from the kv store.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    ///
    /// # Errors
    /// Returns an error if the database insert fails.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the database delete fails.
    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Deserialize the JSON stored under `key`.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored JSON does not match `T`.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.kv_get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// # Errors
    /// Returns an error if serialization or the insert fails.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv_set(key, &raw)
    }

    // ── Engine state ─────────────────────────────────────────────────

    /// # Errors
    /// See [`load_json`](Self::load_json).
    pub fn load_timer(&self) -> Result<Option<TimerEngine>> {
        self.load_json(TIMER_KEY)
    }

    /// # Errors
    /// See [`save_json`](Self::save_json).
    pub fn save_timer(&self, engine: &TimerEngine) -> Result<()> {
        self.save_json(TIMER_KEY, engine)
    }

    /// The stored ledger, or an empty one on first run.
    ///
    /// # Errors
    /// See [`load_json`](Self::load_json).
    pub fn load_ledger(&self) -> Result<Ledger> {
        Ok(self.load_json(LEDGER_KEY)?.unwrap_or_default())
    }

    /// # Errors
    /// See [`save_json`](Self::save_json).
    pub fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        self.save_json(LEDGER_KEY, ledger)
    }

    // ── Sessions ─────────────────────────────────────────────────────

    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(&self, record: &SessionRecord) -> Result<()> {
        let phase = serde_json::to_value(record.phase)?;
        self.conn.execute(
            "INSERT INTO sessions (phase, mode_id, duration_secs, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                phase.as_str().unwrap_or_default(),
                record.mode_id,
                i64::try_from(record.duration_secs).unwrap_or(i64::MAX),
                record.completed_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            ],
        )?;
        Ok(())
    }

    /// Most recent sessions first.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is malformed.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT phase, mode_id, duration_secs, completed_at
             FROM sessions ORDER BY completed_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (phase, mode_id, duration, completed_at) = row?;
            let phase: TimerPhase = serde_json::from_value(serde_json::Value::String(phase))?;
            let completed_at = NaiveDateTime::parse_from_str(&completed_at, "%Y-%m-%dT%H:%M:%S")
                .map_err(|e| {
                    DatabaseError::QueryFailed(format!("bad timestamp '{completed_at}': {e}"))
                })?;
            records.push(SessionRecord {
                phase,
                mode_id,
                duration_secs: u64::try_from(duration).unwrap_or(0),
                completed_at,
            });
        }
        Ok(records)
    }

    /// Delete every stored row.
    ///
    /// # Errors
    /// Returns an error if the delete fails.
    pub fn clear(&self) -> Result<()> {
        self.conn
            .execute_batch("DELETE FROM kv; DELETE FROM sessions;")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::modes::default_preset;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn kv_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("missing").unwrap(), None);
        db.kv_set("k", "v1").unwrap();
        db.kv_set("k", "v2").unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some("v2"));
        db.kv_delete("k").unwrap();
        assert_eq!(db.kv_get("k").unwrap(), None);
    }

    #[test]
    fn timer_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomodore.db");
        let clock = ManualClock::new(at(9, 0));

        let mut engine = TimerEngine::new(default_preset());
        engine.start(&clock);
        clock.advance_secs(90);
        engine.tick(&clock);
        Database::open_at(&path).unwrap().save_timer(&engine).unwrap();

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.load_timer().unwrap(), Some(engine));
    }

    #[test]
    fn ledger_defaults_when_missing() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.load_ledger().unwrap(), Ledger::default());
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let db = Database::open_memory().unwrap();
        db.kv_set(LEDGER_KEY, "{not json").unwrap();
        assert!(db.load_ledger().is_err());
    }

    #[test]
    fn sessions_newest_first() {
        let db = Database::open_memory().unwrap();
        for (phase, time) in [
            (TimerPhase::Focus, at(9, 25)),
            (TimerPhase::ShortBreak, at(9, 30)),
            (TimerPhase::Focus, at(9, 55)),
        ] {
            db.record_session(&SessionRecord {
                phase,
                mode_id: "traditional".into(),
                duration_secs: 1500,
                completed_at: time,
            })
            .unwrap();
        }

        let recent = db.recent_sessions(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].completed_at, at(9, 55));
        assert_eq!(recent[1].phase, TimerPhase::ShortBreak);
    }

    #[test]
    fn clear_removes_everything() {
        let db = Database::open_memory().unwrap();
        db.kv_set("k", "v").unwrap();
        db.record_session(&SessionRecord {
            phase: TimerPhase::Focus,
            mode_id: "traditional".into(),
            duration_secs: 1500,
            completed_at: at(10, 0),
        })
        .unwrap();
        db.clear().unwrap();
        assert_eq!(db.kv_get("k").unwrap(), None);
        assert!(db.recent_sessions(10).unwrap().is_empty());
    }
}
