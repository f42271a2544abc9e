pub mod queries;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Bad artists column: {0}")]
    Artists(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

pub struct Database {
    pub conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<()> {
        self.conn.pragma_update(None, "journal_mode", "WAL")?;
        self.conn.pragma_update(None, "synchronous", "NORMAL")?;
        self.migrate()?;
        Ok(())
    }

    fn migrate(&self) -> Result<()> {
        let version: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if version < 1 {
            self.migrate_v1()?;
        }

        self.conn.pragma_update(None, "user_version", 1)?;
        Ok(())
    }

    /// V1: catalog table, one row per song in dataset order
    fn migrate_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS catalog (
                position        INTEGER PRIMARY KEY,
                track_id        TEXT NOT NULL UNIQUE,
                name            TEXT NOT NULL,
                -- JSON array, primary artist first
                artists         TEXT NOT NULL,

                danceability     REAL NOT NULL,
                energy           REAL NOT NULL,
                key              REAL NOT NULL,
                loudness         REAL NOT NULL,
                mode             REAL NOT NULL,
                speechiness      REAL NOT NULL,
                acousticness     REAL NOT NULL,
                instrumentalness REAL NOT NULL,
                liveness         REAL NOT NULL,
                valence          REAL NOT NULL,
                tempo            REAL NOT NULL,
                duration_ms      REAL NOT NULL,

                imported_at     TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_catalog_name ON catalog(name);
            ",
        )?;
        Ok(())
    }
}
