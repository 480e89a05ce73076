//! TrackerStore implementation over a single SQLite database.
//!
//! Trackers and their completion histories live in two tables; identifiers
//! come from AUTOINCREMENT, so an id is never reused even after its tracker
//! is deleted. Timestamps and adjustments are stored as integer
//! milliseconds. A JSON backup format rides alongside for export/import.

use crate::config::StorageConfig;
use crate::domain::{CompletionRecord, Tracker};
use crate::error::{Result, TrakrError};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DB_FILE: &str = "trackers.db";

/// Portable backup document written by `export` and read by `import`.
#[derive(Debug, Serialize, Deserialize)]
struct Backup {
    #[serde(rename = "exported-at")]
    exported_at: DateTime<Utc>,
    trackers: Vec<Tracker>,
}

/// TrackerStore manages persisted trackers and their histories.
pub struct TrackerStore {
    /// Directory holding the database
    base_dir: PathBuf,

    /// SQLite connection
    db: Connection,
}

impl TrackerStore {
    /// Open or create the store at the configured data directory.
    pub fn open(storage: &StorageConfig) -> Result<Self> {
        Self::open_at(&storage.data_dir)
    }

    /// Open or create the store at the specified directory.
    ///
    /// Useful for testing with custom paths.
    pub fn open_at(base_dir: &Path) -> Result<Self> {
        fs::create_dir_all(base_dir)
            .map_err(|e| TrakrError::Storage(format!("Failed to create {}: {e}", base_dir.display())))?;

        let db_path = base_dir.join(DB_FILE);
        let db = Connection::open(&db_path)
            .map_err(|e| TrakrError::Storage(format!("Failed to open {}: {e}", db_path.display())))?;

        Self::init_schema(&db)?;

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            db,
        })
    }

    /// Initialize the SQLite schema.
    fn init_schema(db: &Connection) -> Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS trackers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                sigma REAL NOT NULL,
                created_at INTEGER NOT NULL,
                modified_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS completions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tracker_id INTEGER NOT NULL,
                completed_at INTEGER NOT NULL,
                adjustment INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_completions_tracker
                ON completions(tracker_id, completed_at);
            "#,
        )?;

        Ok(())
    }

    /// Create a new tracker with an empty history.
    ///
    /// Names are trimmed; blank names are rejected.
    pub fn create_tracker(&mut self, name: &str, sigma: f64) -> Result<Tracker> {
        let name = validated_name(name)?;
        let now = Utc::now().timestamp_millis();
        self.db.execute(
            "INSERT INTO trackers (name, sigma, created_at, modified_at) VALUES (?1, ?2, ?3, ?3)",
            params![name, sigma, now],
        )?;
        self.get(self.db.last_insert_rowid())
    }

    /// Get a tracker by id, history loaded in completion-time order.
    pub fn get(&self, id: i64) -> Result<Tracker> {
        let result = self.db.query_row(
            "SELECT id, name, sigma, created_at, modified_at FROM trackers WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            },
        );

        let (id, name, sigma, created_at, modified_at) = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(TrakrError::TrackerNotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Tracker {
            id,
            name,
            sigma,
            history: self.load_history(id)?,
            created_at: millis_to_datetime(created_at)?,
            modified_at: millis_to_datetime(modified_at)?,
        })
    }

    /// List every tracker, ordered by id.
    pub fn list_all(&self) -> Result<Vec<Tracker>> {
        let mut stmt = self.db.prepare("SELECT id FROM trackers ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        ids.into_iter().map(|id| self.get(id)).collect()
    }

    /// Resolve a selector: a numeric id, or an exact display name.
    pub fn find(&self, selector: &str) -> Result<Tracker> {
        let selector = selector.trim();
        if let Ok(id) = selector.parse::<i64>() {
            return self.get(id);
        }

        let mut stmt = self.db.prepare("SELECT id FROM trackers WHERE name = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map([selector], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        match ids.as_slice() {
            [] => Err(TrakrError::TrackerNotFound(selector.to_string())),
            [id] => self.get(*id),
            _ => Err(TrakrError::AmbiguousTracker(selector.to_string())),
        }
    }

    /// Record a completion and return the updated tracker.
    pub fn record_completion(&mut self, id: i64, record: CompletionRecord) -> Result<Tracker> {
        self.get(id)?;
        self.db.execute(
            "INSERT INTO completions (tracker_id, completed_at, adjustment) VALUES (?1, ?2, ?3)",
            params![
                id,
                record.completed_at.timestamp_millis(),
                record.adjustment.num_milliseconds(),
            ],
        )?;
        self.touch(id)?;
        self.get(id)
    }

    /// Replace the completion at a 1-based index into the time-sorted history.
    pub fn amend_completion(&mut self, id: i64, index: usize, record: CompletionRecord) -> Result<Tracker> {
        self.get(id)?;
        let rowid = self.completion_rowid_at(id, index)?;
        self.db.execute(
            "UPDATE completions SET completed_at = ?1, adjustment = ?2 WHERE id = ?3",
            params![
                record.completed_at.timestamp_millis(),
                record.adjustment.num_milliseconds(),
                rowid,
            ],
        )?;
        self.touch(id)?;
        self.get(id)
    }

    /// Remove the completion at a 1-based index into the time-sorted history.
    pub fn forget_completion(&mut self, id: i64, index: usize) -> Result<Tracker> {
        self.get(id)?;
        let rowid = self.completion_rowid_at(id, index)?;
        self.db.execute("DELETE FROM completions WHERE id = ?1", [rowid])?;
        self.touch(id)?;
        self.get(id)
    }

    /// Rename a tracker.
    ///
    /// Names are trimmed; blank names are rejected.
    pub fn rename(&mut self, id: i64, name: &str) -> Result<Tracker> {
        let name = validated_name(name)?;
        let updated = self.db.execute(
            "UPDATE trackers SET name = ?1, modified_at = ?2 WHERE id = ?3",
            params![name, Utc::now().timestamp_millis(), id],
        )?;
        if updated == 0 {
            return Err(TrakrError::TrackerNotFound(id.to_string()));
        }
        self.get(id)
    }

    /// Change a tracker's confidence multiplier.
    pub fn set_sigma(&mut self, id: i64, sigma: f64) -> Result<Tracker> {
        let updated = self.db.execute(
            "UPDATE trackers SET sigma = ?1, modified_at = ?2 WHERE id = ?3",
            params![sigma, Utc::now().timestamp_millis(), id],
        )?;
        if updated == 0 {
            return Err(TrakrError::TrackerNotFound(id.to_string()));
        }
        self.get(id)
    }

    /// Delete a tracker and its completions.
    pub fn delete_tracker(&mut self, id: i64) -> Result<()> {
        let tx = self.db.transaction()?;
        tx.execute("DELETE FROM completions WHERE tracker_id = ?1", [id])?;
        let deleted = tx.execute("DELETE FROM trackers WHERE id = ?1", [id])?;
        tx.commit()?;

        if deleted == 0 {
            return Err(TrakrError::TrackerNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Write a pretty-printed JSON backup of every tracker.
    ///
    /// Returns the number of trackers written.
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let backup = Backup {
            exported_at: Utc::now(),
            trackers: self.list_all()?,
        };
        let json = serde_json::to_string_pretty(&backup)?;
        fs::write(path, json)?;
        Ok(backup.trackers.len())
    }

    /// Read a JSON backup, inserting each tracker as a new row.
    ///
    /// Identifiers are never reused, so imported trackers get fresh ids.
    /// Histories are re-sorted by timestamp to tolerate hand-edited backups.
    /// Returns the number of trackers imported.
    pub fn import<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let content = fs::read_to_string(path)?;
        let backup: Backup = serde_json::from_str(&content)?;

        let tx = self.db.transaction()?;
        for tracker in &backup.trackers {
            tx.execute(
                "INSERT INTO trackers (name, sigma, created_at, modified_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    tracker.name,
                    tracker.sigma,
                    tracker.created_at.timestamp_millis(),
                    tracker.modified_at.timestamp_millis(),
                ],
            )?;
            let new_id = tx.last_insert_rowid();

            let mut history = tracker.history.clone();
            history.sort_by_key(|record| record.completed_at);
            for record in &history {
                tx.execute(
                    "INSERT INTO completions (tracker_id, completed_at, adjustment) VALUES (?1, ?2, ?3)",
                    params![
                        new_id,
                        record.completed_at.timestamp_millis(),
                        record.adjustment.num_milliseconds(),
                    ],
                )?;
            }
        }
        tx.commit()?;

        Ok(backup.trackers.len())
    }

    /// Get the directory holding the database.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn load_history(&self, tracker_id: i64) -> Result<Vec<CompletionRecord>> {
        let mut stmt = self.db.prepare(
            "SELECT completed_at, adjustment FROM completions WHERE tracker_id = ?1 ORDER BY completed_at, id",
        )?;
        let rows = stmt.query_map([tracker_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut history = Vec::new();
        for row in rows {
            let (completed_at, adjustment) = row?;
            history.push(CompletionRecord::new(
                millis_to_datetime(completed_at)?,
                Duration::milliseconds(adjustment),
            ));
        }
        Ok(history)
    }

    /// Map a 1-based index into the time-sorted history to a completion rowid.
    fn completion_rowid_at(&self, tracker_id: i64, index: usize) -> Result<i64> {
        let mut stmt = self.db.prepare(
            "SELECT id FROM completions WHERE tracker_id = ?1 ORDER BY completed_at, id",
        )?;
        let rowids = stmt
            .query_map([tracker_id], |row| row.get::<_, i64>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        if index == 0 || index > rowids.len() {
            return Err(TrakrError::HistoryIndex {
                index,
                len: rowids.len(),
            });
        }
        Ok(rowids[index - 1])
    }

    fn touch(&self, id: i64) -> Result<()> {
        self.db.execute(
            "UPDATE trackers SET modified_at = ?1 WHERE id = ?2",
            params![Utc::now().timestamp_millis(), id],
        )?;
        Ok(())
    }
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| TrakrError::Storage(format!("Timestamp out of range: {ms}")))
}

fn validated_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrakrError::EmptyName);
    }
    Ok(name)
}
