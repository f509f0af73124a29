// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Voxa store, gateway, and sync engine.
//!
//! Entity kinds and change operations are closed enumerations stored as
//! lowercase TEXT in SQLite; `strum` provides the string round-trip.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Delivery channel of a queued outgoing message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Whatsapp,
    Sms,
    Email,
}

/// Lifecycle status of a queued message.
///
/// The only transition the core performs is `Pending` -> `Sent`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Sent,
    Failed,
}

/// Which entity table a change-log entry refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Message,
    Command,
    Contact,
    Reminder,
}

/// The mutation a change-log entry records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// An outgoing message queued for delivery through the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedMessage {
    pub id: i64,
    pub contact_name: String,
    pub contact_number: String,
    pub body: String,
    pub kind: MessageKind,
    pub status: MessageStatus,
    pub created_at: String,
    pub sent_at: Option<String>,
}

/// One processed voice command, kept for conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: i64,
    pub raw_text: String,
    pub command_type: String,
    pub intent: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// A locally cached contact. `name` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub number: String,
    pub email: Option<String>,
    /// Free-form category ("personal", "work", ...).
    pub kind: String,
    pub last_updated: String,
}

/// A reminder; `is_triggered` flips false -> true exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub text: String,
    pub trigger_time: String,
    pub is_triggered: bool,
    pub created_at: String,
}

/// One row of the append-only change log (outbox).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: i64,
    pub entity: EntityKind,
    pub record_id: i64,
    pub op: ChangeOp,
    pub synced: bool,
    pub created_at: String,
}

/// Point-in-time row counts across the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub pending_messages: i64,
    pub total_commands: i64,
    pub total_contacts: i64,
    pub active_reminders: i64,
    pub unsynced_changes: i64,
}

// --- Gateway payload types ---

/// Submission payload for one queued message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub kind: MessageKind,
    pub contact: String,
    pub number: String,
    pub body: String,
}

/// A single change descriptor within a batch submission.
///
/// Describes *that* a record changed, not the changed values; the backend
/// re-reads current state from the entity submissions in the same cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeDescriptor {
    pub id: i64,
    pub entity: EntityKind,
    pub record_id: i64,
    pub op: ChangeOp,
}

/// Batch of unsynced change descriptors, submitted all-or-nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub changes: Vec<ChangeDescriptor>,
}

/// One contact row within a snapshot submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub number: String,
    pub email: Option<String>,
}

/// Full current contact snapshot; contact sync is never incremental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    pub contacts: Vec<ContactPayload>,
}

/// Submission payload for one active reminder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderPayload {
    pub text: String,
    pub time: String,
}

impl From<&ChangeLogEntry> for ChangeDescriptor {
    fn from(entry: &ChangeLogEntry) -> Self {
        Self {
            id: entry.id,
            entity: entry.entity,
            record_id: entry.record_id,
            op: entry.op,
        }
    }
}

impl From<&Contact> for ContactPayload {
    fn from(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            number: contact.number.clone(),
            email: contact.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn message_kind_round_trips_through_strings() {
        for kind in [MessageKind::Whatsapp, MessageKind::Sms, MessageKind::Email] {
            let s = kind.to_string();
            assert_eq!(MessageKind::from_str(&s).unwrap(), kind);
        }
        assert_eq!(MessageKind::Whatsapp.to_string(), "whatsapp");
    }

    #[test]
    fn entity_kind_and_op_are_lowercase_text() {
        assert_eq!(EntityKind::Message.to_string(), "message");
        assert_eq!(EntityKind::Reminder.to_string(), "reminder");
        assert_eq!(ChangeOp::Insert.to_string(), "insert");
        assert!(EntityKind::from_str("widget").is_err());
    }

    #[test]
    fn change_batch_serializes_with_lowercase_tags() {
        let batch = ChangeBatch {
            changes: vec![ChangeDescriptor {
                id: 1,
                entity: EntityKind::Contact,
                record_id: 7,
                op: ChangeOp::Insert,
            }],
        };
        let json = serde_json::to_string(&batch).unwrap();
        assert!(json.contains(r#""entity":"contact""#));
        assert!(json.contains(r#""op":"insert""#));
    }
}
