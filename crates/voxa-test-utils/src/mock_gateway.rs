// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock remote gateway for deterministic testing.
//!
//! `MockGateway` implements [`RemoteGateway`] with scriptable reachability
//! and per-category failure toggles, and captures every submission for
//! assertion in tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use voxa_core::{
    ChangeBatch, ContactSnapshot, MessagePayload, ReminderPayload, RemoteGateway, VoxaError,
};

/// A scriptable in-memory gateway.
///
/// Starts reachable with every category succeeding. Tests flip
/// [`set_online`](Self::set_online) and the per-category failure toggles to
/// exercise offline transitions and partial-failure drains, then inspect
/// the captured payloads.
pub struct MockGateway {
    online: AtomicBool,
    fail_messages: AtomicBool,
    fail_changes: AtomicBool,
    fail_contacts: AtomicBool,
    fail_reminders: AtomicBool,
    probe_delay_ms: AtomicUsize,
    probes: AtomicUsize,
    messages: Mutex<Vec<MessagePayload>>,
    change_batches: Mutex<Vec<ChangeBatch>>,
    contact_snapshots: Mutex<Vec<ContactSnapshot>>,
    reminders: Mutex<Vec<ReminderPayload>>,
}

impl MockGateway {
    /// Create a reachable gateway that accepts everything.
    pub fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
            fail_messages: AtomicBool::new(false),
            fail_changes: AtomicBool::new(false),
            fail_contacts: AtomicBool::new(false),
            fail_reminders: AtomicBool::new(false),
            probe_delay_ms: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
            change_batches: Mutex::new(Vec::new()),
            contact_snapshots: Mutex::new(Vec::new()),
            reminders: Mutex::new(Vec::new()),
        }
    }

    /// Make the probe succeed or fail from now on.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Make message submissions fail from now on.
    pub fn set_fail_messages(&self, fail: bool) {
        self.fail_messages.store(fail, Ordering::SeqCst);
    }

    /// Make change-batch submissions fail from now on.
    pub fn set_fail_changes(&self, fail: bool) {
        self.fail_changes.store(fail, Ordering::SeqCst);
    }

    /// Make contact-snapshot submissions fail from now on.
    pub fn set_fail_contacts(&self, fail: bool) {
        self.fail_contacts.store(fail, Ordering::SeqCst);
    }

    /// Make reminder submissions fail from now on.
    pub fn set_fail_reminders(&self, fail: bool) {
        self.fail_reminders.store(fail, Ordering::SeqCst);
    }

    /// Delay each probe, to hold a sync cycle open mid-flight.
    pub fn set_probe_delay(&self, delay: Duration) {
        self.probe_delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    /// Number of health probes received.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// All message payloads accepted so far (failed submissions excluded).
    pub async fn submitted_messages(&self) -> Vec<MessagePayload> {
        self.messages.lock().await.clone()
    }

    /// All change batches accepted so far.
    pub async fn submitted_change_batches(&self) -> Vec<ChangeBatch> {
        self.change_batches.lock().await.clone()
    }

    /// All contact snapshots accepted so far.
    pub async fn submitted_contact_snapshots(&self) -> Vec<ContactSnapshot> {
        self.contact_snapshots.lock().await.clone()
    }

    /// All reminder payloads accepted so far.
    pub async fn submitted_reminders(&self) -> Vec<ReminderPayload> {
        self.reminders.lock().await.clone()
    }

    fn unreachable_err() -> VoxaError {
        VoxaError::Gateway {
            message: "mock gateway unreachable".to_string(),
            source: None,
        }
    }

    fn rejected_err(category: &str) -> VoxaError {
        VoxaError::Gateway {
            message: format!("mock gateway rejected {category}"),
            source: None,
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe_health(&self) -> Result<(), VoxaError> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let delay = self.probe_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Self::unreachable_err())
        }
    }

    async fn submit_message(&self, payload: &MessagePayload) -> Result<(), VoxaError> {
        if self.fail_messages.load(Ordering::SeqCst) {
            return Err(Self::rejected_err("message"));
        }
        self.messages.lock().await.push(payload.clone());
        Ok(())
    }

    async fn submit_changes(&self, batch: &ChangeBatch) -> Result<(), VoxaError> {
        if self.fail_changes.load(Ordering::SeqCst) {
            return Err(Self::rejected_err("changes"));
        }
        self.change_batches.lock().await.push(batch.clone());
        Ok(())
    }

    async fn submit_contacts(&self, snapshot: &ContactSnapshot) -> Result<(), VoxaError> {
        if self.fail_contacts.load(Ordering::SeqCst) {
            return Err(Self::rejected_err("contacts"));
        }
        self.contact_snapshots.lock().await.push(snapshot.clone());
        Ok(())
    }

    async fn submit_reminder(&self, payload: &ReminderPayload) -> Result<(), VoxaError> {
        if self.fail_reminders.load(Ordering::SeqCst) {
            return Err(Self::rejected_err("reminder"));
        }
        self.reminders.lock().await.push(payload.clone());
        Ok(())
    }
}
