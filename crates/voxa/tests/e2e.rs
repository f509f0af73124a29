// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the store -> change log -> sync engine pipeline.
//!
//! Each test builds an isolated stack: temp SQLite database, a gateway
//! (mock or wiremock-backed HTTP), and a sync engine driven directly.
//! Tests are independent and order-insensitive.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::mpsc;

use voxa_config::model::{GatewayConfig, SyncConfig};
use voxa_core::{MessageKind, RemoteGateway};
use voxa_gateway::HttpGateway;
use voxa_storage::Database;
use voxa_storage::queries::{changelog, commands, contacts, maintenance, messages, reminders};
use voxa_sync::{SyncEngine, SyncEvent};
use voxa_test_utils::MockGateway;

fn sync_config() -> SyncConfig {
    SyncConfig {
        interval_secs: 300,
        retain_days: Some(30),
    }
}

async fn temp_db(dir: &tempfile::TempDir) -> Database {
    let path = dir.path().join("e2e.db");
    Database::open(path.to_str().unwrap(), true).await.unwrap()
}

fn engine_with_mock(
    db: &Database,
    gateway: &Arc<MockGateway>,
) -> (SyncEngine, mpsc::Receiver<SyncEvent>) {
    let (tx, rx) = mpsc::channel(64);
    let engine = SyncEngine::new(
        db.clone(),
        Arc::clone(gateway) as Arc<dyn RemoteGateway>,
        &sync_config(),
        tx,
    );
    (engine, rx)
}

fn collect(rx: &mut mpsc::Receiver<SyncEvent>) -> Vec<SyncEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---- Offline queueing and reconnection ----

#[tokio::test]
async fn queued_work_survives_offline_and_drains_on_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir).await;
    let gateway = Arc::new(MockGateway::new());
    let (mut engine, mut rx) = engine_with_mock(&db, &gateway);

    messages::enqueue_message(&db, "Alice", "+1", "wa hello", MessageKind::Whatsapp)
        .await
        .unwrap();
    messages::enqueue_message(&db, "Bob", "+2", "sms hello", MessageKind::Sms)
        .await
        .unwrap();
    messages::enqueue_message(&db, "Carol", "c@x.io", "mail hello", MessageKind::Email)
        .await
        .unwrap();

    gateway.set_online(false);
    engine.sync_once().await;

    let events = collect(&mut rx);
    assert_eq!(
        events.iter().filter(|e| **e == SyncEvent::WentOffline).count(),
        1,
        "offline edge fires exactly once"
    );
    assert_eq!(maintenance::stats(&db).await.unwrap().pending_messages, 3);
    assert!(gateway.submitted_messages().await.is_empty());

    gateway.set_online(true);
    engine.sync_once().await;

    let events = collect(&mut rx);
    assert_eq!(
        events.iter().filter(|e| **e == SyncEvent::WentOnline).count(),
        1,
        "online edge fires exactly once"
    );
    let stats = maintenance::stats(&db).await.unwrap();
    assert_eq!(stats.pending_messages, 0);
    assert_eq!(stats.unsynced_changes, 0);
    assert_eq!(gateway.submitted_messages().await.len(), 3);

    db.close().await.unwrap();
}

// ---- Contact upsert semantics ----

#[tokio::test]
async fn resaved_contact_yields_one_row_and_two_log_entries() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir).await;

    contacts::upsert_contact(&db, "Alice", "+111", None, "personal")
        .await
        .unwrap();
    contacts::upsert_contact(&db, "Alice", "+999", None, "personal")
        .await
        .unwrap();

    let found = contacts::find_contact(&db, "Alice").await.unwrap().unwrap();
    assert_eq!(found.number, "+999");
    assert_eq!(maintenance::stats(&db).await.unwrap().total_contacts, 1);

    let entries = changelog::unsynced_entries(&db).await.unwrap();
    assert_eq!(entries.len(), 2, "one entry per save call");
    assert!(entries.iter().all(|e| !e.synced));

    // The next cycle retires both and sends one current snapshot.
    let gateway = Arc::new(MockGateway::new());
    let (mut engine, _rx) = engine_with_mock(&db, &gateway);
    engine.sync_once().await;

    assert!(changelog::unsynced_entries(&db).await.unwrap().is_empty());
    let snapshots = gateway.submitted_contact_snapshots().await;
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].contacts[0].number, "+999");

    db.close().await.unwrap();
}

// ---- Reminder lifecycle ----

#[tokio::test]
async fn synced_reminder_stays_active_until_host_triggers_it() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir).await;
    let gateway = Arc::new(MockGateway::new());
    let (mut engine, _rx) = engine_with_mock(&db, &gateway);

    let id = reminders::save_reminder(&db, "check oven", Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    engine.sync_once().await;
    assert_eq!(gateway.submitted_reminders().await.len(), 1);

    // Submission has no side effect on the row.
    let active = reminders::list_active(&db, Utc::now()).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, id);

    // Only the host retires it.
    reminders::mark_triggered(&db, id).await.unwrap();
    assert!(reminders::list_active(&db, Utc::now()).await.unwrap().is_empty());

    db.close().await.unwrap();
}

// ---- Full pipeline against a real HTTP boundary ----

#[tokio::test]
async fn engine_drains_store_through_http_gateway() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    for endpoint in ["send-sms", "sync-data", "sync-contacts", "set-reminder"] {
        Mock::given(method("POST"))
            .and(path(format!("/api/{endpoint}")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir).await;

    messages::enqueue_message(&db, "Bob", "+2", "on my way", MessageKind::Sms)
        .await
        .unwrap();
    contacts::upsert_contact(&db, "Bob", "+2", None, "personal")
        .await
        .unwrap();
    reminders::save_reminder(&db, "leave now", Utc::now() - Duration::seconds(5))
        .await
        .unwrap();
    commands::record_command(&db, "text bob on my way", "message", Some("send_sms"))
        .await
        .unwrap();

    let gateway_config = GatewayConfig {
        base_url: format!("{}/api", server.uri()),
        probe_timeout_secs: 2,
        request_timeout_secs: 2,
    };
    let http: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(gateway_config).unwrap());
    let (tx, mut rx) = mpsc::channel(64);
    let mut engine = SyncEngine::new(db.clone(), http, &sync_config(), tx);

    engine.sync_once().await;

    let events = collect(&mut rx);
    assert!(events.iter().any(|e| matches!(e, SyncEvent::SyncCompleted { .. })));

    let stats = maintenance::stats(&db).await.unwrap();
    assert_eq!(stats.pending_messages, 0);
    assert_eq!(stats.unsynced_changes, 0);
    // History and the reminder stay on-device; sync never deletes them.
    assert_eq!(stats.total_commands, 1);
    assert_eq!(stats.active_reminders, 1);

    db.close().await.unwrap();
}

// ---- Command history and retention ----

#[tokio::test]
async fn history_reads_back_and_retention_spares_unsynced_work() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir).await;

    commands::record_command(&db, "remind me to stretch", "reminder", Some("set_reminder"))
        .await
        .unwrap();
    commands::record_command(&db, "call mom", "call", Some("make_call"))
        .await
        .unwrap();

    let recent = commands::history(&db, 10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].raw_text, "call mom");

    // Nothing synced yet: a sweep with a future cutoff removes history rows
    // but must leave every unsynced change-log entry in place.
    let outcome = maintenance::purge_older_than(&db, Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(outcome.commands_deleted, 2);
    assert_eq!(outcome.changes_deleted, 0);
    assert_eq!(maintenance::stats(&db).await.unwrap().unsynced_changes, 2);

    db.close().await.unwrap();
}

// ---- Idempotent delivery bookkeeping ----

#[tokio::test]
async fn repeated_mark_sent_leaves_single_transition() {
    let dir = tempfile::tempdir().unwrap();
    let db = temp_db(&dir).await;

    let id = messages::enqueue_message(&db, "A", "1", "x", MessageKind::Whatsapp)
        .await
        .unwrap();

    assert!(messages::mark_message_sent(&db, id).await.unwrap());
    assert!(!messages::mark_message_sent(&db, id).await.unwrap());
    assert!(!messages::mark_message_sent(&db, id).await.unwrap());

    // Exactly two log entries: the enqueue insert and one sent update.
    let entries = changelog::unsynced_entries(&db).await.unwrap();
    assert_eq!(entries.len(), 2);

    db.close().await.unwrap();
}
