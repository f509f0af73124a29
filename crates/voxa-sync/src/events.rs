// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events the sync engine emits to its host.
//!
//! Events are delivered on a single mpsc channel in emission order -- one
//! designated consumer context, never concurrent callbacks.

/// Observer events for the host (UI or service layer).
///
/// Per-item failure detail never appears here; it is logged internally.
/// The host sees mode transitions and aggregate counts only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A sync cycle began.
    SyncStarted,
    /// A cycle finished with the backend reachable.
    ///
    /// `items_synced` counts delivered messages plus change-log entries
    /// retired in the batch. Items left pending by per-item failures are
    /// not an error; they retry next cycle.
    SyncCompleted { items_synced: usize },
    /// A cycle ended without draining anything (probe failed).
    SyncFailed { reason: String },
    /// Connectivity transitioned online -> offline.
    WentOffline,
    /// Connectivity transitioned offline -> online.
    WentOnline,
}

/// Point-in-time engine state, readable through [`SyncHandle::status`].
///
/// [`SyncHandle::status`]: crate::engine::SyncHandle::status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub is_online: bool,
    pub is_syncing: bool,
    /// Completion time of the last successful cycle, ISO-8601 UTC.
    pub last_sync: Option<String>,
}
