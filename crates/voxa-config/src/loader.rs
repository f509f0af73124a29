// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./voxa.toml` > `~/.config/voxa/voxa.toml` > `/etc/voxa/voxa.toml`
//! with environment variable overrides via `VOXA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VoxaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/voxa/voxa.toml` (system-wide)
/// 3. `~/.config/voxa/voxa.toml` (user XDG config)
/// 4. `./voxa.toml` (local directory)
/// 5. `VOXA_*` environment variables
pub fn load_config() -> Result<VoxaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoxaConfig::default()))
        .merge(Toml::file("/etc/voxa/voxa.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("voxa/voxa.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("voxa.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<VoxaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoxaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VoxaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VoxaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `VOXA_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("VOXA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: VOXA_GATEWAY_BASE_URL -> "gateway_base_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("sync_", "sync.", 1);
        mapped.into()
    })
}
