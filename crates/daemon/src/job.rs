// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-flight command instances (§3 Job, §4.4).
//!
//! A `Job` pairs the common header the scheduler cares about (id, kind,
//! state, result) with a `Box<dyn JobHooks>` carrying the command-specific
//! payload and behaviour — a tagged variant with a typed payload, with
//! completion handled per-variant via [`JobHooks::on_reply`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use orch_core::error::NodeError;
use orch_core::job::{JobId, JobKind, JobResult, JobState};
use tokio::sync::mpsc;

use crate::node::NodeConn;
use crate::orchestrator::Command;

/// What a job's `start` or `on_reply` hook decided should happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// More replies are still outstanding; do nothing yet.
    StillWaiting,
    /// All outstanding work has completed; finish the job with this result.
    Finished(JobResult),
}

/// Context a job's `start` hook needs to dispatch its fan-out and report
/// back to the orchestrator task.
pub struct JobStartContext {
    pub job_id: JobId,
    /// Snapshot of registered nodes' connections at start time (§4.6: "snapshot
    /// the current node list by iteration").
    pub nodes: Vec<Arc<NodeConn>>,
    pub cmd_tx: mpsc::Sender<Command>,
    pub rpc_timeout: Duration,
}

/// Per-kind behaviour (§3, §4.4): `start`, `on_reply`, `cancel`, `teardown`.
///
/// `start` and `on_reply` return a [`ReplyOutcome`] rather than calling
/// `finish` themselves — only the orchestrator task may schedule a finish
/// transition, since it alone knows whether one is already pending (I3).
#[async_trait]
pub trait JobHooks: Send + Sync {
    async fn start(&mut self, ctx: JobStartContext) -> ReplyOutcome;

    /// Invoked once per completed per-node call. The default no-op fits a
    /// job kind with no asynchronous fan-out.
    fn on_reply(&mut self, _result: Result<(), NodeError>) -> ReplyOutcome {
        ReplyOutcome::StillWaiting
    }

    /// No-op in this specification (§4.6 open question on in-flight
    /// cancellation).
    fn cancel(&mut self) {}

    /// Releases any borrowed resources (§4.4: "releases the source message
    /// reference").
    fn teardown(&mut self) {}
}

/// An in-flight command instance (§3 Job).
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub object_path: String,
    pub state: JobState,
    pub result: JobResult,
    pub hooks: Box<dyn JobHooks>,
}
