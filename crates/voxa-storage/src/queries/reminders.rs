// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reminder operations.
//!
//! "Active" means due and not yet triggered; the set is recomputed from
//! `trigger_time` and `is_triggered` on every query, never cached.

use chrono::{DateTime, Utc};
use rusqlite::params;

use voxa_core::{ChangeOp, EntityKind, Reminder, VoxaError};

use crate::database::Database;
use crate::queries::{changelog, to_sqlite_ts};

fn row_to_reminder(row: &rusqlite::Row<'_>) -> Result<Reminder, rusqlite::Error> {
    Ok(Reminder {
        id: row.get(0)?,
        text: row.get(1)?,
        trigger_time: row.get(2)?,
        is_triggered: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Save a reminder due at `trigger_time`, with its change-log entry.
pub async fn save_reminder(
    db: &Database,
    text: &str,
    trigger_time: DateTime<Utc>,
) -> Result<i64, VoxaError> {
    let text = text.to_string();
    let trigger_time = to_sqlite_ts(trigger_time);
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO reminders (text, trigger_time, is_triggered) VALUES (?1, ?2, 0)",
                params![text, trigger_time],
            )?;
            let id = tx.last_insert_rowid();
            changelog::log_change(&tx, EntityKind::Reminder, id, ChangeOp::Insert)?;
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Reminders due at `now` and not yet triggered, soonest first.
pub async fn list_active(db: &Database, now: DateTime<Utc>) -> Result<Vec<Reminder>, VoxaError> {
    let now = to_sqlite_ts(now);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, text, trigger_time, is_triggered, created_at
                 FROM reminders WHERE is_triggered = 0 AND trigger_time <= ?1
                 ORDER BY trigger_time ASC",
            )?;
            let rows = stmt.query_map(params![now], |row| row_to_reminder(row))?;
            let mut reminders = Vec::new();
            for row in rows {
                reminders.push(row?);
            }
            Ok(reminders)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip a reminder to triggered. Idempotent; the flip appends a change-log
/// `update` entry, a repeat call appends nothing.
///
/// The sync engine never calls this: submitting a reminder does not
/// retire it. The host flips it after alerting the user.
pub async fn mark_triggered(db: &Database, id: i64) -> Result<bool, VoxaError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE reminders SET is_triggered = 1 WHERE id = ?1 AND is_triggered = 0",
                params![id],
            )?;
            if updated > 0 {
                changelog::log_change(&tx, EntityKind::Reminder, id, ChangeOp::Update)?;
            }
            tx.commit()?;
            Ok(updated > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::changelog::unsynced_entries;
    use chrono::Duration;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn due_reminder_appears_in_active_list() {
        let db = setup_db().await;
        let now = Utc::now();

        let id = save_reminder(&db, "water the plants", now - Duration::seconds(1))
            .await
            .unwrap();

        let active = list_active(&db, now).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, id);
        assert!(!active[0].is_triggered);
    }

    #[tokio::test]
    async fn future_reminder_is_not_active_yet() {
        let db = setup_db().await;
        let now = Utc::now();

        save_reminder(&db, "later", now + Duration::hours(1))
            .await
            .unwrap();

        assert!(list_active(&db, now).await.unwrap().is_empty());
        // It becomes active once `now` passes the trigger time.
        let later = now + Duration::hours(2);
        assert_eq!(list_active(&db, later).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn active_list_is_ordered_by_trigger_time() {
        let db = setup_db().await;
        let now = Utc::now();

        let second = save_reminder(&db, "b", now - Duration::seconds(10))
            .await
            .unwrap();
        let first = save_reminder(&db, "a", now - Duration::seconds(60))
            .await
            .unwrap();

        let ids: Vec<i64> = list_active(&db, now)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[tokio::test]
    async fn mark_triggered_removes_from_active_and_is_idempotent() {
        let db = setup_db().await;
        let now = Utc::now();
        let id = save_reminder(&db, "ping", now - Duration::seconds(1))
            .await
            .unwrap();

        assert!(mark_triggered(&db, id).await.unwrap());
        assert!(!mark_triggered(&db, id).await.unwrap());
        assert!(list_active(&db, now).await.unwrap().is_empty());

        // Insert entry plus exactly one update entry.
        let entries = unsynced_entries(&db).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].op, ChangeOp::Update);
    }
}
