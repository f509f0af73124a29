// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for store entities.
//!
//! The canonical types are defined in `voxa-core::types` for use across the
//! gateway and sync-engine boundaries. This module re-exports them for
//! convenience within the storage crate.

pub use voxa_core::types::{
    ChangeLogEntry, ChangeOp, CommandRecord, Contact, EntityKind, MessageKind, MessageStatus,
    QueuedMessage, Reminder, StoreStats,
};
