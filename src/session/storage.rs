// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! SQLite-based session storage.
//!
//! Sessions, their transcript entries and their events live in three tables.
//! Entries and events are append-only and are read back in insertion order.

use std::path::{Path, PathBuf};
#[cfg(feature = "telemetry")]
use std::time::Instant;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::error::SessionError;

#[cfg(feature = "telemetry")]
use crate::telemetry::metrics::GLOBAL_METRICS;

use super::events::{DirectoryChangeEvent, EventLog, SessionEvent};
use super::types::{EntryRole, Session, SessionInfo, TranscriptEntry};

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Session storage using SQLite.
pub struct SessionStorage {
    conn: Connection,
    path: PathBuf,
}

impl SessionStorage {
    /// Open or create the default session database.
    pub fn open() -> Result<Self, SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let result = Self::open_at(&default_database_path()?)?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.open", start.elapsed());

        Ok(result)
    }

    /// Open or create a session database at a specific path.
    pub fn open_at(db_path: &Path) -> Result<Self, SessionError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        let mut storage = Self {
            conn,
            path: db_path.to_path_buf(),
        };
        storage.init_schema()?;

        debug!(path = %db_path.display(), "Opened session database");
        Ok(storage)
    }

    fn init_schema(&mut self) -> Result<(), SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                title TEXT,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS transcript_entries (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                session_id TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS session_events (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                session_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                from_directory TEXT,
                to_directory TEXT NOT NULL,
                transcript_position INTEGER NOT NULL,
                FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_updated_at ON sessions(updated_at DESC);
            CREATE INDEX IF NOT EXISTS idx_entries_session_id ON transcript_entries(session_id, seq);
            CREATE INDEX IF NOT EXISTS idx_events_session_id ON session_events(session_id, seq);
            "#,
        )?;

        let current_version: Option<u32> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?;

        if current_version.is_none() {
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?)",
                params![SCHEMA_VERSION],
            )?;
        }

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.init_schema", start.elapsed());

        Ok(())
    }

    /// Insert a session together with its current transcript and events.
    pub fn create_session(&mut self, session: &Session) -> Result<(), SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO sessions (id, title, created_at, updated_at) VALUES (?, ?, ?, ?)",
            params![
                session.id,
                session.title,
                session.created_at,
                session.updated_at
            ],
        )?;
        for entry in session.transcript() {
            insert_entry(&tx, &session.id, entry)?;
        }
        for event in session.events().iter() {
            insert_event(&tx, &session.id, event)?;
        }
        tx.commit()?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.create", start.elapsed());

        Ok(())
    }

    /// Update a session's title and timestamp.
    pub fn update_session(&self, session: &Session) -> Result<(), SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let rows = self.conn.execute(
            "UPDATE sessions SET title = ?, updated_at = ? WHERE id = ?",
            params![session.title, session.updated_at, session.id],
        )?;
        if rows == 0 {
            return Err(SessionError::NotFound(session.id.clone()));
        }

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.update", start.elapsed());

        Ok(())
    }

    /// Load a session with its transcript and event log.
    pub fn get_session(&self, id: &str) -> Result<Option<Session>, SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let header = self
            .conn
            .query_row(
                "SELECT id, title, created_at, updated_at FROM sessions WHERE id = ?",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, title, created_at, updated_at)) = header else {
            return Ok(None);
        };

        let transcript = self.get_entries(&id)?;
        let events = self.get_events(&id)?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.get", start.elapsed());

        Ok(Some(Session::restore(
            id, title, created_at, updated_at, transcript, events,
        )))
    }

    /// Delete a session with its entries and events.
    pub fn delete_session(&self, id: &str) -> Result<bool, SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        // Entries and events go via CASCADE
        let rows = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?", params![id])?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.delete", start.elapsed());

        Ok(rows > 0)
    }

    /// List all sessions, most recently updated first.
    pub fn list_sessions(&self) -> Result<Vec<SessionInfo>, SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let mut stmt = self.conn.prepare(
            r#"
            SELECT s.id, s.title, s.created_at, s.updated_at,
                   (SELECT COUNT(*) FROM transcript_entries WHERE session_id = s.id),
                   (SELECT COUNT(*) FROM session_events WHERE session_id = s.id)
            FROM sessions s
            ORDER BY s.updated_at DESC, s.rowid DESC
            "#,
        )?;

        let sessions = stmt
            .query_map([], |row| {
                Ok(SessionInfo {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                    entry_count: row.get(4)?,
                    event_count: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.list", start.elapsed());

        Ok(sessions)
    }

    /// Append one transcript entry to a stored session.
    pub fn append_entry(&self, session_id: &str, entry: &TranscriptEntry) -> Result<(), SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        insert_entry(&self.conn, session_id, entry)?;
        self.bump(session_id, entry.created_at)?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.append_entry", start.elapsed());

        Ok(())
    }

    /// Append one event to a stored session.
    pub fn append_event(&self, session_id: &str, event: &SessionEvent) -> Result<(), SessionError> {
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        insert_event(&self.conn, session_id, event)?;
        self.bump(session_id, chrono::Utc::now().timestamp())?;

        #[cfg(feature = "telemetry")]
        GLOBAL_METRICS.record_operation("session.storage.append_event", start.elapsed());

        Ok(())
    }

    fn bump(&self, session_id: &str, updated_at: i64) -> Result<(), SessionError> {
        let rows = self.conn.execute(
            "UPDATE sessions SET updated_at = MAX(updated_at, ?) WHERE id = ?",
            params![updated_at, session_id],
        )?;
        if rows == 0 {
            return Err(SessionError::NotFound(session_id.to_string()));
        }
        Ok(())
    }

    fn get_entries(&self, session_id: &str) -> Result<Vec<TranscriptEntry>, SessionError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, role, content, created_at
            FROM transcript_entries
            WHERE session_id = ?
            ORDER BY seq ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, role, content, created_at)| {
                let role = EntryRole::parse(&role).ok_or_else(|| {
                    SessionError::Corrupted(format!("unknown entry role '{}' in {}", role, id))
                })?;
                Ok(TranscriptEntry {
                    id,
                    role,
                    content,
                    created_at,
                })
            })
            .collect()
    }

    fn get_events(&self, session_id: &str) -> Result<EventLog, SessionError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, kind, from_directory, to_directory, transcript_position
            FROM session_events
            WHERE session_id = ?
            ORDER BY seq ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![session_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, kind, from, to, position)| {
                if kind != DIRECTORY_CHANGE {
                    return Err(SessionError::Corrupted(format!(
                        "unknown event kind '{}' in {}",
                        kind, id
                    )));
                }
                let id = uuid::Uuid::parse_str(&id)
                    .map_err(|e| SessionError::Corrupted(format!("bad event id {}: {}", id, e)))?;
                let position = usize::try_from(position).map_err(|_| {
                    SessionError::Corrupted(format!("negative transcript position in {}", id))
                })?;
                Ok(SessionEvent::from(DirectoryChangeEvent::restore(
                    id, from, to, position,
                )))
            })
            .collect()
    }

    /// Get the database path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

const DIRECTORY_CHANGE: &str = "directory_change";

fn insert_entry(
    conn: &Connection,
    session_id: &str,
    entry: &TranscriptEntry,
) -> Result<(), SessionError> {
    conn.execute(
        r#"
        INSERT INTO transcript_entries (id, session_id, role, content, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
        params![
            entry.id,
            session_id,
            entry.role.as_str(),
            entry.content,
            entry.created_at
        ],
    )?;
    Ok(())
}

fn insert_event(conn: &Connection, session_id: &str, event: &SessionEvent) -> Result<(), SessionError> {
    match event {
        SessionEvent::DirectoryChange(change) => {
            conn.execute(
                r#"
                INSERT INTO session_events (
                    id, session_id, kind, from_directory, to_directory, transcript_position
                ) VALUES (?, ?, ?, ?, ?, ?)
                "#,
                params![
                    change.id().to_string(),
                    session_id,
                    DIRECTORY_CHANGE,
                    change.from_directory(),
                    change.to_directory(),
                    change.transcript_position() as i64
                ],
            )?;
        }
    }
    Ok(())
}

/// `~/.config/pine/sessions.db`.
pub fn default_database_path() -> Result<PathBuf, SessionError> {
    let config_dir = crate::config::get_global_config_dir()
        .ok_or_else(|| SessionError::IoError("Could not determine home directory".to_string()))?;
    Ok(config_dir.join("sessions.db"))
}
