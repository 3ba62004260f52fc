use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use chrono::Utc;

use super::data::AuthSession;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored session is corrupt: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not create session directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not determine user data directory")]
    NoDataDir,
}

/// The SessionStore persists the signed-in session between launches.
/// It holds at most one row: the bearer token and the user it belongs to.
pub struct SessionStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SessionStore {
    /// Open (or create) the session database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, SessionError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;

        log::debug!("📁 Session database at: {}", db_path.display());

        let store = SessionStore {
            conn,
            db_path: db_path.to_path_buf(),
        };
        store.init_schema()?;

        Ok(store)
    }

    /// Get the default location of the session database
    ///
    /// - Linux: ~/.local/share/photo-share/session.db
    /// - macOS: ~/Library/Application Support/photo-share/session.db
    /// - Windows: %APPDATA%\photo-share\session.db
    pub fn default_path() -> Result<PathBuf, SessionError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(SessionError::NoDataDir)?;

        path.push("photo-share");
        path.push("session.db");
        Ok(path)
    }

    fn init_schema(&self) -> Result<(), SessionError> {
        // Single-row table: id is pinned to 1
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                id              INTEGER PRIMARY KEY CHECK (id = 1),
                token           TEXT NOT NULL,
                user_json       TEXT NOT NULL,
                saved_at        INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Store `session`, replacing any previous one
    pub fn save(&self, session: &AuthSession) -> Result<(), SessionError> {
        let user_json = serde_json::to_string(&session.user)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO session (id, token, user_json, saved_at)
             VALUES (1, ?1, ?2, ?3)",
            rusqlite::params![&session.token, &user_json, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Load the stored session, if there is one
    pub fn load(&self) -> Result<Option<AuthSession>, SessionError> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT token, user_json FROM session WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((token, user_json)) => {
                let user = serde_json::from_str(&user_json)?;
                Ok(Some(AuthSession { token, user }))
            }
            None => Ok(None),
        }
    }

    /// Forget the stored session
    pub fn clear(&self) -> Result<(), SessionError> {
        self.conn.execute("DELETE FROM session", [])?;
        Ok(())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Role, User};

    fn session(token: &str) -> AuthSession {
        AuthSession {
            token: token.to_string(),
            user: User {
                id: "u1".to_string(),
                username: "ana".to_string(),
                email: Some("ana@example.com".to_string()),
                role: Role::Consumer,
            },
        }
    }

    #[test]
    fn test_empty_store_has_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(&dir.path().join("session.db")).unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.db");

        {
            let store = SessionStore::open(&path).unwrap();
            store.save(&session("t-1")).unwrap();
        }

        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), Some(session("t-1")));
    }

    #[test]
    fn test_save_replaces_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(&dir.path().join("session.db")).unwrap();
        store.save(&session("old")).unwrap();
        store.save(&session("new")).unwrap();

        assert_eq!(store.load().unwrap().map(|s| s.token), Some("new".to_string()));
    }

    #[test]
    fn test_clear_forgets_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(&dir.path().join("session.db")).unwrap();
        store.save(&session("t-1")).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
