// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite local store and change log for the Voxa assistant client.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed CRUD
//! operations for queued messages, command history, contacts, reminders,
//! and the append-only change log the sync engine drains.
//!
//! The core invariant lives here: every mutating operation appends exactly
//! one change-log row in the same transaction as the mutation, so no
//! mutation silently escapes the outbox.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
pub use queries::maintenance::PurgeOutcome;
