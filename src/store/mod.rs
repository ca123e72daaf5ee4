//! Store module - SQLite-backed key-value persistence
//!
//! Holds the login state, the theme flag and the per-user workout history.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const KEY_TOKEN: &str = "token";
pub const KEY_EMAIL: &str = "email";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_DARK_MODE: &str = "isDarkMode";

/// History key shared by sessions that never stored an identity
const HISTORY_KEY_BASE: &str = "workoutHistory";

/// Completed-workout record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    pub date: String,
}

/// Key-value store wrapper
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store file
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// History key for the stored identity, falling back to the shared key
    /// when nobody is logged in.
    pub fn history_key(&self) -> String {
        match self.get(KEY_EMAIL) {
            Ok(Some(email)) => format!("{HISTORY_KEY_BASE}_{email}"),
            _ => HISTORY_KEY_BASE.to_string(),
        }
    }

    /// Load the completed-workout list for the current identity.
    ///
    /// A missing key, a read error or a parse error all come back as an
    /// empty list; the caller never sees an error state.
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        let key = self.history_key();
        match self.get(&key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                debug!("Unreadable history under {}: {}", key, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                debug!("History read failed for {}: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Append one completed workout to the current identity's history.
    pub fn append_history(&self, entry: HistoryEntry) -> Result<()> {
        let key = self.history_key();
        let mut history = self.load_history();
        history.push(entry);
        self.set(&key, &serde_json::to_string(&history)?)?;
        Ok(())
    }

    /// Logout wipe: drops the token, the credentials and the identity's
    /// history, and resets the theme flag to light.
    ///
    /// The history key must be derived while the identity rows still exist.
    pub fn clear_session(&self) -> Result<()> {
        let history_key = self.history_key();
        self.remove(&history_key)?;
        self.remove(KEY_TOKEN)?;
        self.remove(KEY_EMAIL)?;
        self.remove(KEY_PASSWORD)?;
        self.set(KEY_DARK_MODE, "false")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, date: &str) -> HistoryEntry {
        HistoryEntry {
            name: name.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_get_missing_key() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_TOKEN, "abc").unwrap();
        assert_eq!(store.get(KEY_TOKEN).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_set_overwrites() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_DARK_MODE, "true").unwrap();
        store.set(KEY_DARK_MODE, "false").unwrap();
        assert_eq!(store.get(KEY_DARK_MODE).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_remove() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_TOKEN, "abc").unwrap();
        store.remove(KEY_TOKEN).unwrap();
        assert_eq!(store.get(KEY_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_history_key_without_identity() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(store.history_key(), "workoutHistory");
    }

    #[test]
    fn test_history_key_with_identity() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_EMAIL, "ann@example.com").unwrap();
        assert_eq!(store.history_key(), "workoutHistory_ann@example.com");
    }

    #[test]
    fn test_load_history_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_append_then_load_round_trips() {
        let store = Store::open_in_memory().unwrap();
        store.append_history(entry("Core Strength", "2025-01-04 18:30")).unwrap();
        store.append_history(entry("Cardio Burnout", "2025-01-05 07:10")).unwrap();
        let history = store.load_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], entry("Core Strength", "2025-01-04 18:30"));
        assert_eq!(history[1], entry("Cardio Burnout", "2025-01-05 07:10"));
    }

    #[test]
    fn test_history_is_per_identity() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_EMAIL, "ann@example.com").unwrap();
        store.append_history(entry("Full Body Blast", "2025-01-04 18:30")).unwrap();
        store.set(KEY_EMAIL, "bob@example.com").unwrap();
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_corrupt_history_reads_as_empty() {
        let store = Store::open_in_memory().unwrap();
        store.set(HISTORY_KEY_BASE, "not json").unwrap();
        assert!(store.load_history().is_empty());
    }

    #[test]
    fn test_append_on_corrupt_history_starts_over() {
        let store = Store::open_in_memory().unwrap();
        store.set(HISTORY_KEY_BASE, "{broken").unwrap();
        store.append_history(entry("Core Strength", "2025-01-04 18:30")).unwrap();
        assert_eq!(store.load_history().len(), 1);
    }

    #[test]
    fn test_clear_session_wipes_identity_history() {
        let store = Store::open_in_memory().unwrap();
        store.set(KEY_TOKEN, "tok").unwrap();
        store.set(KEY_EMAIL, "ann@example.com").unwrap();
        store.set(KEY_PASSWORD, "hunter2").unwrap();
        store.set(KEY_DARK_MODE, "true").unwrap();
        store.append_history(entry("Core Strength", "2025-01-04 18:30")).unwrap();

        store.clear_session().unwrap();

        assert_eq!(store.get(KEY_TOKEN).unwrap(), None);
        assert_eq!(store.get(KEY_EMAIL).unwrap(), None);
        assert_eq!(store.get(KEY_PASSWORD).unwrap(), None);
        assert_eq!(store.get(KEY_DARK_MODE).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("workoutHistory_ann@example.com").unwrap(), None);
        assert!(store.load_history().is_empty());
    }
}
