// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for Voxa's external collaborators.

pub mod gateway;

pub use gateway::RemoteGateway;
