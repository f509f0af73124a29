// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use tokio_rusqlite::Connection;
use tracing::debug;

use voxa_config::model::StorageConfig;
use voxa_core::VoxaError;

use crate::migrations;

/// Convert a tokio-rusqlite error into `VoxaError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> VoxaError {
    VoxaError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the on-device SQLite database.
///
/// Wraps a single `tokio_rusqlite::Connection`; all query modules accept
/// `&Database` and go through [`Database::connection`], which serializes
/// every closure on one background thread. Cloning shares the same
/// underlying connection.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if necessary) the database at `path` and run migrations.
    ///
    /// `wal_mode` controls the journal mode; WAL is what production configs
    /// use, rollback journal is kept available for constrained filesystems.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, VoxaError> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| VoxaError::Storage {
                    source: Box::new(e),
                })?;
            }
        }
        let conn = Connection::open(path).await.map_err(map_tr_err)?;
        let db = Self::configure(conn, wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, VoxaError> {
        let conn = Connection::open_in_memory().await.map_err(map_tr_err)?;
        Self::configure(conn, false).await
    }

    /// Open the database described by a [`StorageConfig`].
    pub async fn from_config(config: &StorageConfig) -> Result<Self, VoxaError> {
        Self::open(&config.database_path, config.wal_mode).await
    }

    async fn configure(conn: Connection, wal_mode: bool) -> Result<Self, VoxaError> {
        let journal = if wal_mode { "WAL" } else { "DELETE" };
        let pragmas = format!(
            "PRAGMA journal_mode = {journal};
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;"
        );
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(&pragmas)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        // Migrations produce a non-rusqlite error, so it rides out of the
        // closure as a value rather than through the closure's error type.
        let migrated = conn
            .call(|conn| -> Result<Result<(), VoxaError>, rusqlite::Error> {
                Ok(migrations::run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?;
        migrated?;

        Ok(Self { conn })
    }

    /// Access the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(&self) -> Result<(), VoxaError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("open_test.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        assert!(db_path.exists(), "database file should be created");

        // The migration must have created all five tables.
        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                     AND name IN ('messages', 'commands', 'contacts', 'reminders', 'change_log')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(count, 5);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/deeper/voxa.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_is_idempotent_across_restarts() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path, true).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        // Reopening must not re-run already-applied migrations.
        let db = Database::open(path, true).await.unwrap();
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn in_memory_database_has_schema() {
        let db = Database::open_in_memory().await.unwrap();
        let count: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT COUNT(*) FROM change_log", [], |row| row.get(0))
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
