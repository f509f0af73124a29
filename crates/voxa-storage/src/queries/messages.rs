// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outgoing-message queue operations.

use rusqlite::params;

use voxa_core::{ChangeOp, EntityKind, MessageKind, QueuedMessage, VoxaError};

use crate::database::Database;
use crate::queries::{changelog, parse_enum};

fn row_to_message(row: &rusqlite::Row<'_>) -> Result<QueuedMessage, rusqlite::Error> {
    let kind: String = row.get(4)?;
    let status: String = row.get(5)?;
    Ok(QueuedMessage {
        id: row.get(0)?,
        contact_name: row.get(1)?,
        contact_number: row.get(2)?,
        body: row.get(3)?,
        kind: parse_enum(4, &kind)?,
        status: parse_enum(5, &status)?,
        created_at: row.get(6)?,
        sent_at: row.get(7)?,
    })
}

/// Queue an outgoing message for delivery once the backend is reachable.
///
/// Inserts with status `pending` and appends the change-log row in the same
/// transaction. Returns the new message id.
pub async fn enqueue_message(
    db: &Database,
    contact_name: &str,
    contact_number: &str,
    body: &str,
    kind: MessageKind,
) -> Result<i64, VoxaError> {
    let contact_name = contact_name.to_string();
    let contact_number = contact_number.to_string();
    let body = body.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO messages (contact_name, contact_number, body, kind, status)
                 VALUES (?1, ?2, ?3, ?4, 'pending')",
                params![contact_name, contact_number, body, kind.to_string()],
            )?;
            let id = tx.last_insert_rowid();
            changelog::log_change(&tx, EntityKind::Message, id, ChangeOp::Insert)?;
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All pending messages, oldest first. Sent and failed rows are excluded.
pub async fn list_pending(db: &Database) -> Result<Vec<QueuedMessage>, VoxaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, contact_name, contact_number, body, kind, status, created_at, sent_at
                 FROM messages WHERE status = 'pending'
                 ORDER BY created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map([], |row| row_to_message(row))?;
            let mut pending = Vec::new();
            for row in rows {
                pending.push(row?);
            }
            Ok(pending)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a message sent, stamping `sent_at`.
///
/// Idempotent: only a `pending` row transitions, and only that transition
/// appends a change-log row. Calling this on an already-sent id is a no-op.
/// Returns whether the message was newly marked.
pub async fn mark_message_sent(db: &Database, id: i64) -> Result<bool, VoxaError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE messages SET status = 'sent',
                 sent_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'pending'",
                params![id],
            )?;
            if updated > 0 {
                changelog::log_change(&tx, EntityKind::Message, id, ChangeOp::Update)?;
            }
            tx.commit()?;
            Ok(updated > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
