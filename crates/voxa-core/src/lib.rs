// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Voxa assistant client.
//!
//! This crate provides the error type, domain types, and the remote-gateway
//! trait used throughout the Voxa workspace. The store, gateway client, and
//! sync engine crates all build on the definitions here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VoxaError;
pub use traits::RemoteGateway;
pub use types::{
    ChangeBatch, ChangeDescriptor, ChangeLogEntry, ChangeOp, CommandRecord, Contact,
    ContactPayload, ContactSnapshot, EntityKind, MessageKind, MessagePayload, MessageStatus,
    QueuedMessage, Reminder, ReminderPayload, StoreStats,
};
