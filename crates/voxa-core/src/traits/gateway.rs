// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote gateway trait: the boundary to the backend service.

use async_trait::async_trait;

use crate::error::VoxaError;
use crate::types::{ChangeBatch, ContactSnapshot, MessagePayload, ReminderPayload};

/// Boundary to the remote backend used by the sync engine.
///
/// The engine treats the gateway as opaque: a cheap reachability probe plus
/// per-category submission endpoints. Implementations must be safe to call
/// from the single engine task; every call either succeeds or fails within
/// a bounded time.
#[async_trait]
pub trait RemoteGateway: Send + Sync + 'static {
    /// Human-readable name of this gateway instance, for logging.
    fn name(&self) -> &str;

    /// Cheap reachability check, distinct from data submission.
    async fn probe_health(&self) -> Result<(), VoxaError>;

    /// Submit one queued message for delivery.
    async fn submit_message(&self, payload: &MessagePayload) -> Result<(), VoxaError>;

    /// Submit a batch of change descriptors ("changes since last sync").
    async fn submit_changes(&self, batch: &ChangeBatch) -> Result<(), VoxaError>;

    /// Submit the full current contact snapshot.
    async fn submit_contacts(&self, snapshot: &ContactSnapshot) -> Result<(), VoxaError>;

    /// Submit one active reminder.
    async fn submit_reminder(&self, payload: &ReminderPayload) -> Result<(), VoxaError>;
}
