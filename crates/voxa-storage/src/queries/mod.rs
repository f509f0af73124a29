// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on store entities.
//!
//! Every mutating operation here appends exactly one change-log row in the
//! same transaction as the mutation; `changelog::log_change` is the only
//! way a mutation reaches the outbox.

pub mod changelog;
pub mod commands;
pub mod contacts;
pub mod maintenance;
pub mod messages;
pub mod reminders;

use std::str::FromStr;

use chrono::{DateTime, Utc};

/// Parse a TEXT enum column, converting strum parse failures into the
/// rusqlite conversion error for the offending column index.
pub(crate) fn parse_enum<T>(idx: usize, value: &str) -> Result<T, rusqlite::Error>
where
    T: FromStr<Err = strum::ParseError>,
{
    value.parse().map_err(|e: strum::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Format a timestamp the way SQLite's `strftime('%Y-%m-%dT%H:%M:%fZ')`
/// does, so chrono-supplied values compare correctly against column defaults.
pub(crate) fn to_sqlite_ts(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
