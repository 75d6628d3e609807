// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `IsolateAll`: the reference fan-out command (§4.6).

use async_trait::async_trait;
use orch_core::error::NodeError;
use orch_core::job::JobResult;
use tracing::debug;

use crate::job::{JobHooks, JobStartContext, ReplyOutcome};
use crate::orchestrator::Command;

/// Payload for an `IsolateAll` job: the target string (owned here rather
/// than borrowed from a "source message," since there is no retained client
/// request object in this transport) and the outstanding-reply counter.
pub struct IsolateAllJob {
    target: String,
    outstanding: u32,
    failed: bool,
}

impl IsolateAllJob {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into(), outstanding: 0, failed: false }
    }
}

#[async_trait]
impl JobHooks for IsolateAllJob {
    async fn start(&mut self, ctx: JobStartContext) -> ReplyOutcome {
        for conn in &ctx.nodes {
            self.outstanding += 1;
            let conn = conn.clone();
            let target = self.target.clone();
            let cmd_tx = ctx.cmd_tx.clone();
            let job_id = ctx.job_id;
            let timeout = ctx.rpc_timeout;
            tokio::spawn(async move {
                let result = conn.call_isolate(&target, timeout).await;
                let _ = cmd_tx.send(Command::IsolateReplyReceived { job_id, result }).await;
            });
        }

        if self.outstanding == 0 {
            debug!(target = %self.target, "IsolateAll with no registered nodes, finishing immediately");
            ReplyOutcome::Finished(JobResult::Done)
        } else {
            ReplyOutcome::StillWaiting
        }
    }

    fn on_reply(&mut self, result: Result<(), NodeError>) -> ReplyOutcome {
        if result.is_err() {
            self.failed = true;
        }
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 {
            ReplyOutcome::Finished(if self.failed { JobResult::Failed } else { JobResult::Done })
        } else {
            ReplyOutcome::StillWaiting
        }
    }

    fn teardown(&mut self) {}
}

#[cfg(test)]
#[path = "isolate_tests.rs"]
mod tests;
