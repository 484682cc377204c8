use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, params};

/// Persisted highscore storage using SQLite.
///
/// A single-row table: the session reads it once at start and writes it
/// back whenever the engine reports a beaten highscore.
pub struct HighscoreStore {
    conn: Connection,
}

impl HighscoreStore {
    /// Open or create the store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA synchronous = OFF; PRAGMA journal_mode = WAL;")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS highscore (
                id INTEGER NOT NULL DEFAULT 0,
                value INTEGER NOT NULL DEFAULT 0,
                UNIQUE(id)
            );",
        )?;
        Ok(())
    }

    /// Read the persisted highscore, 0 when none has been saved yet.
    pub fn load(&self) -> Result<u32> {
        let mut stmt = self.conn.prepare("SELECT value FROM highscore WHERE id = 0")?;
        let mut rows = stmt.query_map([], |row| row.get::<_, u32>(0))?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Ok(0),
        }
    }

    /// Persist a highscore, replacing any previous value.
    pub fn save(&self, value: u32) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO highscore (id, value) VALUES (0, ?1)",
            params![value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_reads_as_zero() {
        let store = HighscoreStore::open_in_memory().unwrap();
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn save_and_load_round_trip() {
        let store = HighscoreStore::open_in_memory().unwrap();
        store.save(12).unwrap();
        assert_eq!(store.load().unwrap(), 12);
    }

    #[test]
    fn save_replaces_previous_value() {
        let store = HighscoreStore::open_in_memory().unwrap();
        store.save(5).unwrap();
        store.save(9).unwrap();
        assert_eq!(store.load().unwrap(), 9);
    }

    #[test]
    fn value_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore.db");

        let store = HighscoreStore::open(&path).unwrap();
        store.save(7).unwrap();
        drop(store);

        let store = HighscoreStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), 7);
    }
}
