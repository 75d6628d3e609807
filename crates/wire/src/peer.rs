// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node ⇄ orchestrator peer protocol (§4.2, §4.6, §6).
//!
//! Both directions share one message envelope, the same way a D-Bus peer
//! connection carries method calls and replies over one connection
//! regardless of which side initiated: a node sends `Register` to the
//! orchestrator; the orchestrator sends `Isolate` to a node; either side
//! replies with `Reply`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeMessage {
    /// Peer → orchestrator: the only method a node may call before it has
    /// acquired a name.
    Register { name: String },

    /// Orchestrator → node: the fan-out command's per-node call.
    Isolate { target: String },

    /// Either direction: the reply to whichever call preceded it on this
    /// connection.
    Reply {
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        code: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        message: Option<String>,
    },
}

impl NodeMessage {
    pub fn ok_reply() -> Self {
        NodeMessage::Reply { ok: true, code: None, message: None }
    }

    pub fn err_reply(code: impl Into<String>, message: impl Into<String>) -> Self {
        NodeMessage::Reply { ok: false, code: Some(code.into()), message: Some(message.into()) }
    }
}

#[cfg(test)]
#[path = "peer_tests.rs"]
mod tests;
