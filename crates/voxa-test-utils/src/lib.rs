// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Voxa workspace.
//!
//! Provides a scriptable [`MockGateway`] used by the sync-engine unit tests
//! and the end-to-end tests in the binary crate.

pub mod mock_gateway;

pub use mock_gateway::MockGateway;
