// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of [`RemoteGateway`] against the Voxa backend API.
//!
//! Thin reqwest client: every endpoint is a JSON POST except the health
//! probe, which is a bounded-timeout GET. The sync engine owns all retry
//! policy; this client reports each call's outcome exactly once.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use voxa_config::model::GatewayConfig;
use voxa_core::{
    ChangeBatch, ContactSnapshot, MessageKind, MessagePayload, ReminderPayload, RemoteGateway,
    VoxaError,
};

/// Reqwest-backed gateway client for the backend REST API.
pub struct HttpGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpGateway {
    /// Create a client for the backend described by `config`.
    pub fn new(config: GatewayConfig) -> Result<Self, VoxaError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| VoxaError::Gateway {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), VoxaError> {
        let response = self
            .client
            .post(self.url(path))
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .json(&body)
            .send()
            .await
            .map_err(|e| VoxaError::Gateway {
                message: format!("POST /{path} failed"),
                source: Some(Box::new(e)),
            })?;
        response.error_for_status().map_err(|e| VoxaError::Gateway {
            message: format!("POST /{path} rejected"),
            source: Some(Box::new(e)),
        })?;
        debug!(path, "submission accepted");
        Ok(())
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn probe_health(&self) -> Result<(), VoxaError> {
        let response = self
            .client
            .get(self.url("health"))
            .timeout(Duration::from_secs(self.config.probe_timeout_secs))
            .send()
            .await
            .map_err(|e| VoxaError::Gateway {
                message: "health probe failed".to_string(),
                source: Some(Box::new(e)),
            })?;
        response.error_for_status().map_err(|e| VoxaError::Gateway {
            message: "health probe rejected".to_string(),
            source: Some(Box::new(e)),
        })?;
        Ok(())
    }

    async fn submit_message(&self, payload: &MessagePayload) -> Result<(), VoxaError> {
        // Each channel keeps the backend's historical body shape.
        let (path, body) = match payload.kind {
            MessageKind::Whatsapp => (
                "send-whatsapp",
                json!({ "contact": payload.contact, "message": payload.body }),
            ),
            MessageKind::Sms => (
                "send-sms",
                json!({ "phone": payload.number, "message": payload.body }),
            ),
            MessageKind::Email => (
                "send-email",
                json!({ "to": payload.number, "message": payload.body }),
            ),
        };
        self.post_json(path, body).await
    }

    async fn submit_changes(&self, batch: &ChangeBatch) -> Result<(), VoxaError> {
        self.post_json("sync-data", serde_json::to_value(batch).map_err(to_internal)?)
            .await
    }

    async fn submit_contacts(&self, snapshot: &ContactSnapshot) -> Result<(), VoxaError> {
        self.post_json(
            "sync-contacts",
            serde_json::to_value(snapshot).map_err(to_internal)?,
        )
        .await
    }

    async fn submit_reminder(&self, payload: &ReminderPayload) -> Result<(), VoxaError> {
        self.post_json(
            "set-reminder",
            json!({ "reminder": payload.text, "time": payload.time }),
        )
        .await
    }
}

fn to_internal(e: serde_json::Error) -> VoxaError {
    VoxaError::Internal(format!("payload serialization failed: {e}"))
}
