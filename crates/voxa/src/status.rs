// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voxa status` command implementation.
//!
//! Reads store statistics and probes the backend once, then prints either
//! a human summary or structured JSON for scripting.

use serde::Serialize;

use voxa_config::model::VoxaConfig;
use voxa_core::{RemoteGateway, StoreStats, VoxaError};
use voxa_gateway::HttpGateway;
use voxa_storage::Database;
use voxa_storage::queries::maintenance;

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub backend_reachable: bool,
    pub gateway_url: String,
    pub pending_messages: i64,
    pub total_commands: i64,
    pub total_contacts: i64,
    pub active_reminders: i64,
    pub unsynced_changes: i64,
}

impl StatusReport {
    fn new(config: &VoxaConfig, reachable: bool, stats: StoreStats) -> Self {
        Self {
            backend_reachable: reachable,
            gateway_url: config.gateway.base_url.clone(),
            pending_messages: stats.pending_messages,
            total_commands: stats.total_commands,
            total_contacts: stats.total_contacts,
            active_reminders: stats.active_reminders,
            unsynced_changes: stats.unsynced_changes,
        }
    }
}

/// Run the `voxa status` command.
pub async fn run_status(config: &VoxaConfig, json: bool) -> Result<(), VoxaError> {
    let db = Database::from_config(&config.storage).await?;
    let stats = maintenance::stats(&db).await?;

    let gateway = HttpGateway::new(config.gateway.clone())?;
    let reachable = gateway.probe_health().await.is_ok();

    let report = StatusReport::new(config, reachable, stats);
    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| VoxaError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
    } else {
        let mode = if report.backend_reachable {
            "online"
        } else {
            "offline"
        };
        println!("backend:          {} ({mode})", report.gateway_url);
        println!("pending messages: {}", report.pending_messages);
        println!("command history:  {}", report.total_commands);
        println!("contacts:         {}", report.total_contacts);
        println!("active reminders: {}", report.active_reminders);
        println!("unsynced changes: {}", report.unsynced_changes);
    }

    db.close().await?;
    Ok(())
}
