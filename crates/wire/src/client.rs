// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client control channel protocol (§4.7, §6).
//!
//! This is the concrete stand-in for "the per-user message bus": a Unix
//! domain socket over which clients call `IsolateAll` and subscribe to
//! `JobNew`/`JobRemoved`/`JobStateChanged` signal broadcasts.
//!
//! A connection handles exactly one [`ClientRequest`] before either closing
//! (after a method reply) or upgrading into an indefinite signal stream
//! (after `Subscribe`).

use orch_core::JobId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClientRequest {
    /// §4.7 method: dispatch `Isolate` to every registered node.
    IsolateAll { target: String },

    /// Upgrade this connection into a signal-subscription stream.
    Subscribe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClientMessage {
    /// Method reply carrying the new job's object path.
    JobStarted { id: u32, path: String },

    /// Method reply on failure.
    Error { code: String, message: String },

    /// Signal: emitted on enqueue, strictly before the triggering method's
    /// reply (§4.7, §8).
    JobNew { id: u32, path: String },

    /// Signal: a job's `State` property changed (currently only
    /// Waiting → Running is observable externally).
    JobStateChanged { id: u32, path: String, state: String },

    /// Signal: emitted during finish, before the job's object is detached.
    JobRemoved { id: u32, path: String, result: String },
}

impl ClientMessage {
    pub fn job_new(id: JobId, path: impl Into<String>) -> Self {
        ClientMessage::JobNew { id: id.0, path: path.into() }
    }

    pub fn job_state_changed(id: JobId, path: impl Into<String>, state: impl Into<String>) -> Self {
        ClientMessage::JobStateChanged { id: id.0, path: path.into(), state: state.into() }
    }

    pub fn job_removed(id: JobId, path: impl Into<String>, result: impl Into<String>) -> Self {
        ClientMessage::JobRemoved { id: id.0, path: path.into(), result: result.into() }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
