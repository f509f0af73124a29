// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change-log (outbox) operations.
//!
//! The log records *that* an entity changed, not the diff: the sync engine
//! re-reads current entity state at drain time, so several mutations of the
//! same record between cycles coalesce into one up-to-date payload.

use rusqlite::params;

use voxa_core::{ChangeLogEntry, ChangeOp, EntityKind, VoxaError};

use crate::database::Database;
use crate::queries::parse_enum;

/// Append one change-log row inside the caller's transaction.
///
/// Every mutating query in this crate calls this within the same
/// transaction as the mutation itself; the pair commits or rolls back as
/// one unit.
pub(crate) fn log_change(
    tx: &rusqlite::Transaction<'_>,
    entity: EntityKind,
    record_id: i64,
    op: ChangeOp,
) -> Result<(), rusqlite::Error> {
    tx.execute(
        "INSERT INTO change_log (entity, record_id, op, synced) VALUES (?1, ?2, ?3, 0)",
        params![entity.to_string(), record_id, op.to_string()],
    )?;
    Ok(())
}

/// All entries not yet synced, in replay order (`created_at`, then id for
/// entries created within the same millisecond).
pub async fn unsynced_entries(db: &Database) -> Result<Vec<ChangeLogEntry>, VoxaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, entity, record_id, op, synced, created_at
                 FROM change_log WHERE synced = 0
                 ORDER BY created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map([], |row| {
                let entity: String = row.get(1)?;
                let op: String = row.get(3)?;
                Ok(ChangeLogEntry {
                    id: row.get(0)?,
                    entity: parse_enum(1, &entity)?,
                    record_id: row.get(2)?,
                    op: parse_enum(3, &op)?,
                    synced: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark one entry synced. Idempotent: an already-synced id is a no-op.
///
/// Returns whether the entry was newly retired.
pub async fn mark_synced(db: &Database, id: i64) -> Result<bool, VoxaError> {
    db.connection()
        .call(move |conn| {
            let updated = conn.execute(
                "UPDATE change_log SET synced = 1 WHERE id = ?1 AND synced = 0",
                params![id],
            )?;
            Ok(updated > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a whole batch synced in one transaction.
///
/// Used after a successful batch submission: either every entry in the
/// drained batch is retired or (on storage failure) none are.
pub async fn mark_synced_batch(db: &Database, ids: Vec<i64>) -> Result<(), VoxaError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            for id in &ids {
                tx.execute(
                    "UPDATE change_log SET synced = 1 WHERE id = ?1 AND synced = 0",
                    params![id],
                )?;
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::{contacts, messages};
    use voxa_core::MessageKind;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn every_mutation_appends_exactly_one_entry() {
        let db = setup_db().await;

        messages::enqueue_message(&db, "Alice", "+111", "hi", MessageKind::Sms)
            .await
            .unwrap();
        contacts::upsert_contact(&db, "Alice", "+111", None, "personal")
            .await
            .unwrap();
        contacts::upsert_contact(&db, "Alice", "+222", None, "personal")
            .await
            .unwrap();

        let entries = unsynced_entries(&db).await.unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| !e.synced));
    }

    #[tokio::test]
    async fn unsynced_entries_are_in_creation_order() {
        let db = setup_db().await;

        let m1 = messages::enqueue_message(&db, "A", "1", "x", MessageKind::Whatsapp)
            .await
            .unwrap();
        let m2 = messages::enqueue_message(&db, "B", "2", "y", MessageKind::Email)
            .await
            .unwrap();

        let entries = unsynced_entries(&db).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].record_id, m1);
        assert_eq!(entries[1].record_id, m2);
        assert_eq!(entries[0].entity, EntityKind::Message);
        assert_eq!(entries[0].op, ChangeOp::Insert);
    }

    #[tokio::test]
    async fn mark_synced_is_idempotent() {
        let db = setup_db().await;
        messages::enqueue_message(&db, "A", "1", "x", MessageKind::Sms)
            .await
            .unwrap();

        let entry_id = unsynced_entries(&db).await.unwrap()[0].id;
        assert!(mark_synced(&db, entry_id).await.unwrap());
        assert!(!mark_synced(&db, entry_id).await.unwrap());

        assert!(unsynced_entries(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_synced_batch_retires_all_ids() {
        let db = setup_db().await;
        for i in 0..3 {
            messages::enqueue_message(&db, "A", "1", &format!("m{i}"), MessageKind::Sms)
                .await
                .unwrap();
        }

        let ids: Vec<i64> = unsynced_entries(&db)
            .await
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        mark_synced_batch(&db, ids).await.unwrap();

        assert!(unsynced_entries(&db).await.unwrap().is_empty());
    }
}
