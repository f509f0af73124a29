// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-history operations. Rows are append-only; there is no update
//! path, and old rows are removed only by the retention sweep.

use rusqlite::params;

use voxa_core::{ChangeOp, CommandRecord, EntityKind, VoxaError};

use crate::database::Database;
use crate::queries::changelog;

fn row_to_command(row: &rusqlite::Row<'_>) -> Result<CommandRecord, rusqlite::Error> {
    Ok(CommandRecord {
        id: row.get(0)?,
        raw_text: row.get(1)?,
        command_type: row.get(2)?,
        intent: row.get(3)?,
        status: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Record one processed voice command, with its change-log entry.
pub async fn record_command(
    db: &Database,
    raw_text: &str,
    command_type: &str,
    intent: Option<&str>,
) -> Result<i64, VoxaError> {
    let raw_text = raw_text.to_string();
    let command_type = command_type.to_string();
    let intent = intent.map(|i| i.to_string());
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO commands (raw_text, command_type, intent, status)
                 VALUES (?1, ?2, ?3, 'completed')",
                params![raw_text, command_type, intent],
            )?;
            let id = tx.last_insert_rowid();
            changelog::log_change(&tx, EntityKind::Command, id, ChangeOp::Insert)?;
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The most recent `limit` commands, newest first.
pub async fn history(db: &Database, limit: i64) -> Result<Vec<CommandRecord>, VoxaError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, raw_text, command_type, intent, status, created_at
                 FROM commands ORDER BY created_at DESC, id DESC LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| row_to_command(row))?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
