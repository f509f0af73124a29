// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact cache operations. `name` is the natural key; saves are upserts.

use rusqlite::params;

use voxa_core::{ChangeOp, Contact, EntityKind, VoxaError};

use crate::database::Database;
use crate::queries::changelog;

fn row_to_contact(row: &rusqlite::Row<'_>) -> Result<Contact, rusqlite::Error> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        number: row.get(2)?,
        email: row.get(3)?,
        kind: row.get(4)?,
        last_updated: row.get(5)?,
    })
}

/// Save a contact, replacing any prior row with the same name.
///
/// Always appends an `insert` change-log entry, whether the row was new or
/// replaced: contact sync sends current snapshots, not per-field diffs.
/// Returns the contact's row id (stable across replacements).
pub async fn upsert_contact(
    db: &Database,
    name: &str,
    number: &str,
    email: Option<&str>,
    kind: &str,
) -> Result<i64, VoxaError> {
    let name = name.to_string();
    let number = number.to_string();
    let email = email.map(|e| e.to_string());
    let kind = kind.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO contacts (name, number, email, kind, last_updated)
                 VALUES (?1, ?2, ?3, ?4, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(name) DO UPDATE SET
                     number = excluded.number,
                     email = excluded.email,
                     kind = excluded.kind,
                     last_updated = excluded.last_updated",
                params![name, number, email, kind],
            )?;
            let id: i64 = tx.query_row(
                "SELECT id FROM contacts WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )?;
            changelog::log_change(&tx, EntityKind::Contact, id, ChangeOp::Insert)?;
            tx.commit()?;
            Ok(id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find the first contact whose name contains `fragment` (case-sensitive).
///
/// Rowid order makes repeated lookups stable; callers must not rely on any
/// ranking beyond that.
pub async fn find_contact(db: &Database, fragment: &str) -> Result<Option<Contact>, VoxaError> {
    let fragment = fragment.to_string();
    db.connection()
        .call(move |conn| {
            // instr() rather than LIKE: LIKE is case-insensitive for ASCII.
            let mut stmt = conn.prepare(
                "SELECT id, name, number, email, kind, last_updated
                 FROM contacts WHERE instr(name, ?1) > 0
                 ORDER BY id ASC LIMIT 1",
            )?;
            let result = stmt.query_row(params![fragment], |row| row_to_contact(row));
            match result {
                Ok(contact) => Ok(Some(contact)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All cached contacts ordered by name; feeds the snapshot submission.
pub async fn list_contacts(db: &Database) -> Result<Vec<Contact>, VoxaError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, number, email, kind, last_updated
                 FROM contacts ORDER BY name ASC",
            )?;
            let rows = stmt.query_map([], |row| row_to_contact(row))?;
            let mut contacts = Vec::new();
            for row in rows {
                contacts.push(row?);
            }
            Ok(contacts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::changelog::unsynced_entries;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn upsert_then_find_round_trips() {
        let db = setup_db().await;

        upsert_contact(&db, "Alice Smith", "+1555", Some("alice@example.com"), "personal")
            .await
            .unwrap();

        let found = find_contact(&db, "Alice").await.unwrap().unwrap();
        assert_eq!(found.name, "Alice Smith");
        assert_eq!(found.number, "+1555");
        assert_eq!(found.email.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn upsert_same_name_replaces_row() {
        let db = setup_db().await;

        let id1 = upsert_contact(&db, "Alice", "+111", None, "personal")
            .await
            .unwrap();
        let id2 = upsert_contact(&db, "Alice", "+222", None, "work")
            .await
            .unwrap();
        assert_eq!(id1, id2, "replacing a contact keeps its row id");

        let all = list_contacts(&db).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].number, "+222");
        assert_eq!(all[0].kind, "work");

        // One change-log entry per save call, both still unsynced.
        let entries = unsynced_entries(&db).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.entity == EntityKind::Contact));
        assert!(entries.iter().all(|e| e.op == ChangeOp::Insert));
    }

    #[tokio::test]
    async fn find_is_case_sensitive_substring() {
        let db = setup_db().await;
        upsert_contact(&db, "Bob Jones", "+1", None, "personal")
            .await
            .unwrap();

        assert!(find_contact(&db, "Jon").await.unwrap().is_some());
        assert!(find_contact(&db, "bob").await.unwrap().is_none());
        assert!(find_contact(&db, "Carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_contacts_is_ordered_by_name() {
        let db = setup_db().await;
        upsert_contact(&db, "Zara", "+3", None, "personal").await.unwrap();
        upsert_contact(&db, "Adam", "+1", None, "personal").await.unwrap();
        upsert_contact(&db, "Mia", "+2", None, "personal").await.unwrap();

        let names: Vec<String> = list_contacts(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Adam", "Mia", "Zara"]);
    }
}
