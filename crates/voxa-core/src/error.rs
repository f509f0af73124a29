// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Voxa assistant client core.

use thiserror::Error;

/// The primary error type used across the Voxa store, gateway, and sync engine.
#[derive(Debug, Error)]
pub enum VoxaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local persistence failures (database connection, query failure, corruption).
    ///
    /// Fatal to the operation that triggered it; always propagated to the caller.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote gateway failures (unreachable backend, rejected submission).
    ///
    /// Recovered by retry on the next sync cycle; the engine absorbs these
    /// and surfaces only the online/offline transition to observers.
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
