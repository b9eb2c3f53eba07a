use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub const SAVED_ARTICLES_KEY: &str = "savedArticles";
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
pub const DARK_MODE_KEY: &str = "darkMode";

const MAX_RECENT_SEARCHES: usize = 5;

/// Local key-value store for preferences. Each key holds one JSON document.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Read `key`, falling back to `default` when it is missing or unreadable.
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!("Failed to read {} from store: {}", key, e);
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring malformed value for {}: {}", key, e);
                default
            }
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw)
    }

    #[cfg(test)]
    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn put_raw(&self, key: &str, raw: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, raw],
        )?;
        Ok(())
    }

    pub fn saved_articles(&self) -> Vec<String> {
        self.get_or(SAVED_ARTICLES_KEY, Vec::new())
    }

    pub fn set_saved_articles(&self, ids: &[String]) -> Result<()> {
        self.set(SAVED_ARTICLES_KEY, ids)
    }

    pub fn recent_searches(&self) -> Vec<String> {
        self.get_or(RECENT_SEARCHES_KEY, Vec::new())
    }

    pub fn set_recent_searches(&self, terms: &[String]) -> Result<()> {
        self.set(RECENT_SEARCHES_KEY, terms)
    }

    pub fn poll_vote(&self, key: &str) -> Option<String> {
        self.get_or(key, None)
    }

    pub fn set_poll_vote(&self, key: &str, option: &str) -> Result<()> {
        self.set(key, option)
    }

    pub fn dark_mode(&self) -> bool {
        self.get_or(DARK_MODE_KEY, true)
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.set(DARK_MODE_KEY, &enabled)
    }
}

/// Put `term` at the front of the history, dropping older copies and
/// anything past the fifth entry. Blank terms leave the history unchanged.
pub fn remember_search(history: &[String], term: &str) -> Vec<String> {
    if term.trim().is_empty() {
        return history.to_vec();
    }
    std::iter::once(term.to_string())
        .chain(history.iter().filter(|s| s.as_str() != term).cloned())
        .take(MAX_RECENT_SEARCHES)
        .collect()
}
