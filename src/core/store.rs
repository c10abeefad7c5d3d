use crate::error::{MirrorError, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS mirrors (
    filename TEXT NOT NULL UNIQUE,
    url TEXT NOT NULL,
    archive_filename TEXT,
    post_install TEXT
)";

/// A locally stored copy of a remote file, keyed by its local path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorEntry {
    pub filename: PathBuf,
    pub url: String,
    pub archive_filename: Option<String>,
    pub post_install: Option<String>,
}

impl MirrorEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(MirrorEntry {
            filename: PathBuf::from(row.get::<_, String>(0)?),
            url: row.get(1)?,
            archive_filename: row.get(2)?,
            post_install: row.get(3)?,
        })
    }
}

pub struct MirrorStore {
    conn: Connection,
}

impl MirrorStore {
    pub fn open(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening mirror database");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA_SQL, [])?;
        Ok(MirrorStore { conn })
    }

    pub fn insert(&self, entry: &MirrorEntry) -> Result<()> {
        let filename = path_key(&entry.filename);
        if self.contains(&entry.filename)? {
            return Err(MirrorError::AlreadyInDatabase { path: filename });
        }

        self.conn.execute(
            "INSERT INTO mirrors (filename, url, archive_filename, post_install) VALUES (?1, ?2, ?3, ?4)",
            params![
                filename,
                entry.url,
                entry.archive_filename,
                entry.post_install
            ],
        )?;
        Ok(())
    }

    /// All entries in insertion order
    pub fn list(&self) -> Result<Vec<MirrorEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT filename, url, archive_filename, post_install FROM mirrors ORDER BY rowid",
        )?;
        let entries = stmt
            .query_map([], MirrorEntry::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn get(&self, filename: &Path) -> Result<Option<MirrorEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT filename, url, archive_filename, post_install FROM mirrors WHERE filename = ?1",
                params![path_key(filename)],
                MirrorEntry::from_row,
            )
            .optional()?;
        Ok(entry)
    }

    pub fn contains(&self, filename: &Path) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(filename) FROM mirrors WHERE filename = ?1",
            params![path_key(filename)],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Entries whose filename matches a SQLite GLOB pattern
    pub fn matching_glob(&self, pattern: &str) -> Result<Vec<MirrorEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT filename, url, archive_filename, post_install FROM mirrors WHERE filename GLOB ?1 ORDER BY rowid",
        )?;
        let entries = stmt
            .query_map(params![pattern], MirrorEntry::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn remove_exact(&self, filename: &Path) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM mirrors WHERE filename = ?1",
            params![path_key(filename)],
        )?;
        Ok(removed)
    }

    pub fn remove_glob(&self, pattern: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM mirrors WHERE filename GLOB ?1", params![pattern])?;
        Ok(removed)
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
