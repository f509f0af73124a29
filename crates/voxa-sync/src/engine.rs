// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sync engine: periodic reconciliation of the local store with the
//! remote backend.
//!
//! One engine task owns the whole cycle, so cycles never overlap: the task
//! waits on the interval tick, the on-demand trigger, and the cancellation
//! token, and runs at most one `sync_once` at a time. External triggers go
//! through a capacity-1 channel; a trigger arriving while a cycle is in
//! flight is dropped, not queued behind it.
//!
//! Within a cycle the categories drain sequentially in a fixed order --
//! messages, change log, contacts, reminders -- and items within a category
//! drain in creation order. A failed item stays pending and retries on the
//! next cycle; the interval is the retry policy.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use voxa_config::model::SyncConfig;
use voxa_core::{ChangeBatch, ContactSnapshot, MessagePayload, RemoteGateway, ReminderPayload, VoxaError};
use voxa_storage::Database;
use voxa_storage::queries::{changelog, contacts, messages, reminders};

use crate::events::{SyncEvent, SyncStatus};

/// Engine state shared with handles. `last_sync_ms` is 0 until the first
/// successful cycle.
struct EngineState {
    online: AtomicBool,
    syncing: AtomicBool,
    last_sync_ms: AtomicI64,
}

/// Periodic controller that probes the backend and drains the store.
///
/// Constructed once per process and driven by [`run`](Self::run) on a tokio
/// task; collaborators interact through a [`SyncHandle`].
pub struct SyncEngine {
    db: Database,
    gateway: Arc<dyn RemoteGateway>,
    interval: Duration,
    events: mpsc::Sender<SyncEvent>,
    state: Arc<EngineState>,
    cancel: CancellationToken,
    trigger_tx: mpsc::Sender<()>,
    trigger_rx: mpsc::Receiver<()>,
}

/// Cloneable handle for triggering, observing, and stopping the engine.
#[derive(Clone)]
pub struct SyncHandle {
    trigger: mpsc::Sender<()>,
    state: Arc<EngineState>,
    cancel: CancellationToken,
}

impl SyncEngine {
    /// Create an engine over `db`, submitting through `gateway`.
    ///
    /// Events go to `events`; the host must keep consuming the receiver.
    /// Connectivity starts assumed-online, so the first failed probe emits
    /// [`SyncEvent::WentOffline`].
    pub fn new(
        db: Database,
        gateway: Arc<dyn RemoteGateway>,
        config: &SyncConfig,
        events: mpsc::Sender<SyncEvent>,
    ) -> Self {
        let (trigger_tx, trigger_rx) = mpsc::channel(1);
        Self {
            db,
            gateway,
            interval: Duration::from_secs(config.interval_secs),
            events,
            state: Arc::new(EngineState {
                online: AtomicBool::new(true),
                syncing: AtomicBool::new(false),
                last_sync_ms: AtomicI64::new(0),
            }),
            cancel: CancellationToken::new(),
            trigger_tx,
            trigger_rx,
        }
    }

    /// A handle bound to this engine.
    pub fn handle(&self) -> SyncHandle {
        SyncHandle {
            trigger: self.trigger_tx.clone(),
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
        }
    }

    /// Drive sync cycles until the handle stops the engine.
    ///
    /// The first cycle runs immediately; later cycles follow the configured
    /// interval, plus any on-demand triggers.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            gateway = self.gateway.name(),
            interval_secs = self.interval.as_secs(),
            "sync engine started"
        );
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = interval.tick() => {}
                Some(()) = self.trigger_rx.recv() => {}
            }
            self.sync_once().await;
        }
        info!("sync engine stopped");
    }

    /// Run one full sync cycle.
    ///
    /// Public so hosts and tests can drive cycles without the timer.
    pub async fn sync_once(&mut self) {
        self.state.syncing.store(true, Ordering::SeqCst);
        self.emit(SyncEvent::SyncStarted).await;

        match self.run_cycle().await {
            Ok(items_synced) => {
                self.state
                    .last_sync_ms
                    .store(Utc::now().timestamp_millis(), Ordering::SeqCst);
                self.emit(SyncEvent::SyncCompleted { items_synced }).await;
            }
            Err(e) => {
                self.emit(SyncEvent::SyncFailed {
                    reason: e.to_string(),
                })
                .await;
            }
        }

        self.state.syncing.store(false, Ordering::SeqCst);
    }

    /// Probe, transition connectivity, and drain all categories.
    ///
    /// Only the probe failure is an error here; every per-item and
    /// per-category failure is absorbed so one category's outage never
    /// blocks another's drain.
    async fn run_cycle(&self) -> Result<usize, VoxaError> {
        if let Err(e) = self.gateway.probe_health().await {
            warn!(gateway = self.gateway.name(), error = %e, "backend unreachable");
            if self.state.online.swap(false, Ordering::SeqCst) {
                self.emit(SyncEvent::WentOffline).await;
            }
            return Err(e);
        }
        if !self.state.online.swap(true, Ordering::SeqCst) {
            self.emit(SyncEvent::WentOnline).await;
        }
        if self.cancel.is_cancelled() {
            debug!("engine stopped after probe; skipping drains");
            return Ok(0);
        }

        let mut items = 0;
        items += self.drain_messages().await;
        items += self.drain_changes().await;
        self.drain_contacts().await;
        self.drain_reminders().await;
        Ok(items)
    }

    /// Submit each pending message, oldest first. Success marks the row
    /// sent; failure leaves it pending for the next cycle.
    async fn drain_messages(&self) -> usize {
        let pending = match messages::list_pending(&self.db).await {
            Ok(pending) => pending,
            Err(e) => {
                error!(error = %e, "failed to read pending messages");
                return 0;
            }
        };

        let mut sent = 0;
        for msg in pending {
            let payload = MessagePayload {
                kind: msg.kind,
                contact: msg.contact_name.clone(),
                number: msg.contact_number.clone(),
                body: msg.body.clone(),
            };
            match self.gateway.submit_message(&payload).await {
                Ok(()) => {
                    if self.cancel.is_cancelled() {
                        debug!(id = msg.id, "engine stopped; discarding delivery result");
                        return sent;
                    }
                    match messages::mark_message_sent(&self.db, msg.id).await {
                        Ok(_) => sent += 1,
                        Err(e) => error!(id = msg.id, error = %e, "failed to record delivery"),
                    }
                }
                Err(e) => {
                    warn!(id = msg.id, error = %e, "message submission failed; will retry");
                }
            }
        }
        sent
    }

    /// Submit all unsynced change-log entries as one batch.
    ///
    /// The batch is atomic from the log's perspective: entries are marked
    /// synced only after the whole batch is accepted, never partially.
    async fn drain_changes(&self) -> usize {
        let entries = match changelog::unsynced_entries(&self.db).await {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "failed to read change log");
                return 0;
            }
        };
        if entries.is_empty() {
            return 0;
        }

        let batch = ChangeBatch {
            changes: entries.iter().map(Into::into).collect(),
        };
        match self.gateway.submit_changes(&batch).await {
            Ok(()) => {
                if self.cancel.is_cancelled() {
                    debug!("engine stopped; discarding change-batch result");
                    return 0;
                }
                let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
                let count = ids.len();
                match changelog::mark_synced_batch(&self.db, ids).await {
                    Ok(()) => count,
                    Err(e) => {
                        error!(error = %e, "failed to retire change batch");
                        0
                    }
                }
            }
            Err(e) => {
                warn!(entries = entries.len(), error = %e, "change batch rejected; will retry");
                0
            }
        }
    }

    /// Submit the full contact snapshot whenever any contacts exist.
    /// Contacts carry no per-row sync flag; success has no side effect.
    async fn drain_contacts(&self) {
        let all = match contacts::list_contacts(&self.db).await {
            Ok(all) => all,
            Err(e) => {
                error!(error = %e, "failed to read contacts");
                return;
            }
        };
        if all.is_empty() {
            return;
        }

        let snapshot = ContactSnapshot {
            contacts: all.iter().map(Into::into).collect(),
        };
        if let Err(e) = self.gateway.submit_contacts(&snapshot).await {
            warn!(contacts = all.len(), error = %e, "contact snapshot rejected; will retry");
        }
    }

    /// Submit each currently active reminder. Reminders are never marked
    /// synced; the active set is recomputed from the store every cycle.
    async fn drain_reminders(&self) {
        let active = match reminders::list_active(&self.db, Utc::now()).await {
            Ok(active) => active,
            Err(e) => {
                error!(error = %e, "failed to read reminders");
                return;
            }
        };

        for reminder in active {
            let payload = ReminderPayload {
                text: reminder.text.clone(),
                time: reminder.trigger_time.clone(),
            };
            if let Err(e) = self.gateway.submit_reminder(&payload).await {
                warn!(id = reminder.id, error = %e, "reminder submission failed; will retry");
            }
        }
    }

    async fn emit(&self, event: SyncEvent) {
        if self.events.send(event).await.is_err() {
            debug!("event receiver dropped");
        }
    }
}

impl SyncHandle {
    /// Request a sync cycle now.
    ///
    /// A no-op if a cycle is already in flight or queued -- at most one
    /// sync runs at a time, so duplicate triggers cannot race the same
    /// pending set.
    pub fn sync_now(&self) {
        if self.state.syncing.load(Ordering::SeqCst) {
            debug!("sync already in flight; trigger skipped");
            return;
        }
        if self.trigger.try_send(()).is_err() {
            debug!("sync trigger already queued; trigger skipped");
        }
    }

    /// Current connectivity, activity, and last successful cycle time.
    pub fn status(&self) -> SyncStatus {
        let ms = self.state.last_sync_ms.load(Ordering::SeqCst);
        let last_sync = if ms > 0 {
            DateTime::<Utc>::from_timestamp_millis(ms)
                .map(|t| t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
        } else {
            None
        };
        SyncStatus {
            is_online: self.state.online.load(Ordering::SeqCst),
            is_syncing: self.state.syncing.load(Ordering::SeqCst),
            last_sync,
        }
    }

    /// Stop the engine. In-flight gateway calls resolve on their own, but
    /// their results are discarded rather than applied.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}
