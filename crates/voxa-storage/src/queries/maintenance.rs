// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store statistics and age-based retention.

use chrono::{DateTime, Utc};
use rusqlite::params;

use voxa_core::{StoreStats, VoxaError};

use crate::database::Database;
use crate::queries::to_sqlite_ts;

/// Rows removed by one retention sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeOutcome {
    pub commands_deleted: usize,
    pub changes_deleted: usize,
}

/// Point-in-time counts across the store, read in a single query.
pub async fn stats(db: &Database) -> Result<StoreStats, VoxaError> {
    db.connection()
        .call(|conn| -> Result<StoreStats, rusqlite::Error> {
            conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM messages WHERE status = 'pending'),
                    (SELECT COUNT(*) FROM commands),
                    (SELECT COUNT(*) FROM contacts),
                    (SELECT COUNT(*) FROM reminders WHERE is_triggered = 0),
                    (SELECT COUNT(*) FROM change_log WHERE synced = 0)",
                [],
                |row| {
                    Ok(StoreStats {
                        pending_messages: row.get(0)?,
                        total_commands: row.get(1)?,
                        total_contacts: row.get(2)?,
                        active_reminders: row.get(3)?,
                        unsynced_changes: row.get(4)?,
                    })
                },
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete command history and *synced* change-log entries older than `cutoff`.
///
/// Unsynced change-log entries are never deleted, however old: an entry
/// that has not left the device still owes the backend a submission.
/// Messages, contacts, and reminders are untouched; their retention is an
/// external policy.
pub async fn purge_older_than(
    db: &Database,
    cutoff: DateTime<Utc>,
) -> Result<PurgeOutcome, VoxaError> {
    let cutoff = to_sqlite_ts(cutoff);
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let commands_deleted = tx.execute(
                "DELETE FROM commands WHERE created_at < ?1",
                params![cutoff],
            )?;
            let changes_deleted = tx.execute(
                "DELETE FROM change_log WHERE synced = 1 AND created_at < ?1",
                params![cutoff],
            )?;
            tx.commit()?;
            Ok(PurgeOutcome {
                commands_deleted,
                changes_deleted,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}
