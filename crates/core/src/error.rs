// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared between the daemon and wire crates.
//!
//! One `thiserror` enum per concern: errors in a request path are translated
//! to a `{code, message}` pair on the wire (see `orch-wire`), errors in a
//! spontaneous callback are logged and the connection or operation is
//! abandoned.

use thiserror::Error;

/// Errors arising from node registration and peer RPC dispatch (§7: Conflict,
/// Resource, RPC, Transport).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("node already registered")]
    AlreadyRegistered,

    #[error("node name already registered")]
    NameTaken,

    #[error("no memory")]
    NoMemory,

    #[error("node rpc failed: {0}")]
    Rpc(String),

    #[error("node rpc timed out")]
    Timeout,

    #[error("node disconnected")]
    Disconnected,
}

impl NodeError {
    /// Peer-visible error code, matching the sd-bus error names the source
    /// specification names explicitly (`AddressInUse`, `NoMemory`).
    pub fn code(&self) -> &'static str {
        match self {
            NodeError::AlreadyRegistered | NodeError::NameTaken => "AddressInUse",
            NodeError::NoMemory => "NoMemory",
            NodeError::Rpc(_) => "RpcFailed",
            NodeError::Timeout => "Timeout",
            NodeError::Disconnected => "Disconnected",
        }
    }
}

/// Errors arising from job creation and the client-facing method surface
/// (§7: Parse, Resource).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("failed to parse request: {0}")]
    Parse(String),

    #[error("failed to create job: {0}")]
    NoMemory(String),
}

impl JobError {
    pub fn code(&self) -> &'static str {
        match self {
            JobError::Parse(_) => "InvalidArgs",
            JobError::NoMemory(_) => "NoMemory",
        }
    }
}
