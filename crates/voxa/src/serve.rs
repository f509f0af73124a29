// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voxa serve` command implementation.
//!
//! Opens the local store, starts the sync engine against the configured
//! backend gateway, logs engine events, and runs the daily retention sweep
//! until interrupted.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use voxa_config::model::VoxaConfig;
use voxa_core::{RemoteGateway, VoxaError};
use voxa_gateway::HttpGateway;
use voxa_storage::Database;
use voxa_storage::queries::maintenance;
use voxa_sync::{SyncEngine, SyncEvent};

/// Runs the `voxa serve` command.
///
/// One store, one gateway client, one engine per process, wired here and
/// handed to whoever needs them. Shutdown stops the engine, waits for the
/// current cycle to wind down, and checkpoints the store.
pub async fn run_serve(config: VoxaConfig) -> Result<(), VoxaError> {
    init_tracing(&config.agent.log_level);

    let db = Database::from_config(&config.storage).await?;
    info!(path = %config.storage.database_path, "local store opened");

    let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::new(config.gateway.clone())?);
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let engine = SyncEngine::new(db.clone(), gateway, &config.sync, event_tx);
    let handle = engine.handle();
    let engine_task = tokio::spawn(engine.run());

    // The single designated consumer of engine events.
    let events_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                SyncEvent::SyncStarted => debug!("sync cycle started"),
                SyncEvent::SyncCompleted { items_synced } => {
                    info!(items_synced, "sync cycle complete");
                }
                SyncEvent::SyncFailed { reason } => warn!(%reason, "sync cycle failed"),
                SyncEvent::WentOffline => warn!("backend unreachable; operating offline"),
                SyncEvent::WentOnline => info!("backend reachable; back online"),
            }
        }
    });

    // Daily retention sweep, when configured.
    let retention_task = config.sync.retain_days.map(|days| {
        let db = db.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
                match maintenance::purge_older_than(&db, cutoff).await {
                    Ok(outcome) => debug!(
                        commands = outcome.commands_deleted,
                        changes = outcome.changes_deleted,
                        "retention sweep complete"
                    ),
                    Err(e) => error!(error = %e, "retention sweep failed"),
                }
            }
        })
    });

    info!(
        gateway = %config.gateway.base_url,
        interval_secs = config.sync.interval_secs,
        "voxa serve running; press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| VoxaError::Internal(format!("failed to install signal handler: {e}")))?;
    info!("shutdown requested");

    handle.stop();
    if let Some(task) = retention_task {
        task.abort();
    }
    if engine_task.await.is_err() {
        warn!("engine task ended abnormally");
    }
    // The engine dropped its event sender; the consumer drains and exits.
    if events_task.await.is_err() {
        warn!("event consumer ended abnormally");
    }

    db.close().await?;
    info!("voxa serve shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber from config, honoring `RUST_LOG`.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voxa={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
