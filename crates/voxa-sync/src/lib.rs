// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change-log-driven sync engine for the Voxa assistant client.
//!
//! The engine periodically probes the remote backend, tracks the
//! online/offline transition, and drains the local store's pending work:
//! queued messages, the change-log outbox, the contact snapshot, and active
//! reminders. Delivery is at-least-once; retry is "wait for the next
//! cycle". Hosts observe mode transitions and completion counts through
//! [`SyncEvent`]s, never per-item failures.

pub mod engine;
pub mod events;

pub use engine::{SyncEngine, SyncHandle};
pub use events::{SyncEvent, SyncStatus};
