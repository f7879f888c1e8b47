//! Per-user UI flags kept apart from the finance data.
//!
//! Nothing here is allowed to fail the caller: write errors are logged
//! and dropped, read errors read as "absent".

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::session::UserId;

pub(crate) const WELCOME_SEEN: &str = "has_seen_welcome";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS prefs (
    user_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (user_id, key)
);";

pub(crate) struct Prefs {
    conn: Option<Connection>,
}

impl Prefs {
    /// Opens (creating if needed) the preferences file. A file that cannot
    /// be opened yields a store that remembers nothing.
    pub(crate) fn open(path: &Path) -> Self {
        let conn = Connection::open(path).and_then(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(conn)
        });
        match conn {
            Ok(conn) => Self { conn: Some(conn) },
            Err(e) => {
                log::warn!("Preferences unavailable at {}: {e}", path.display());
                Self { conn: None }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Self {
        let conn = Connection::open_in_memory().and_then(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(conn)
        });
        Self { conn: conn.ok() }
    }

    pub(crate) fn get(&self, user: &UserId, key: &str) -> Option<String> {
        let conn = self.conn.as_ref()?;
        conn.query_row(
            "SELECT value FROM prefs WHERE user_id = ?1 AND key = ?2",
            params![user.as_str(), key],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            log::warn!("Failed to read preference '{key}': {e}");
            None
        })
    }

    pub(crate) fn set(&self, user: &UserId, key: &str, value: &str) {
        self.write(
            key,
            "INSERT INTO prefs (user_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, key) DO UPDATE SET value = excluded.value",
            params![user.as_str(), key, value],
        );
    }

    pub(crate) fn remove(&self, user: &UserId, key: &str) {
        self.write(
            key,
            "DELETE FROM prefs WHERE user_id = ?1 AND key = ?2",
            params![user.as_str(), key],
        );
    }

    /// Forgets every flag of `user`, leaving other users untouched.
    pub(crate) fn clear_user(&self, user: &UserId) {
        self.write(
            "*",
            "DELETE FROM prefs WHERE user_id = ?1",
            params![user.as_str()],
        );
    }

    pub(crate) fn has_seen_welcome(&self, user: &UserId) -> bool {
        self.get(user, WELCOME_SEEN).as_deref() == Some("true")
    }

    pub(crate) fn mark_welcome_seen(&self, user: &UserId) {
        self.set(user, WELCOME_SEEN, "true");
    }

    fn write(&self, key: &str, sql: &str, params: &[&dyn rusqlite::ToSql]) {
        let Some(conn) = self.conn.as_ref() else {
            return;
        };
        if let Err(e) = conn.execute(sql, params) {
            log::warn!("Failed to write preference '{key}': {e}");
        }
    }
}

#[cfg(test)]
#[path = "prefs_tests.rs"]
mod tests;
