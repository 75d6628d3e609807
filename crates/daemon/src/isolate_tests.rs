// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orch_core::job::JobId;
use std::time::Duration;
use tokio::sync::mpsc;

fn context(job_id: u32) -> (JobStartContext, mpsc::Receiver<Command>) {
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    (
        JobStartContext {
            job_id: JobId(job_id),
            nodes: Vec::new(),
            cmd_tx,
            rpc_timeout: Duration::from_secs(30),
        },
        cmd_rx,
    )
}

#[tokio::test]
async fn start_with_no_nodes_finishes_immediately_as_done() {
    let mut job = IsolateAllJob::new("t");
    let (ctx, _rx) = context(1);
    let outcome = job.start(ctx).await;
    assert_eq!(outcome, ReplyOutcome::Finished(JobResult::Done));
}

#[test]
fn on_reply_waits_until_outstanding_reaches_zero() {
    let mut job = IsolateAllJob { target: "t".into(), outstanding: 2, failed: false };
    assert_eq!(job.on_reply(Ok(())), ReplyOutcome::StillWaiting);
    assert_eq!(job.on_reply(Ok(())), ReplyOutcome::Finished(JobResult::Done));
}

#[test]
fn any_failed_reply_marks_the_job_failed() {
    let mut job = IsolateAllJob { target: "t".into(), outstanding: 2, failed: false };
    assert_eq!(job.on_reply(Err(NodeError::Timeout)), ReplyOutcome::StillWaiting);
    assert_eq!(job.on_reply(Ok(())), ReplyOutcome::Finished(JobResult::Failed));
}
