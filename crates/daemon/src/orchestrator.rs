// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The orchestrator facade (§3 Orchestrator, §4.5, §4.7).
//!
//! All mutable state lives on one Tokio task, reached exclusively through
//! [`Command`] messages sent over an `mpsc` channel — the Tokio analogue of
//! "all operations happen on the event loop thread" (§5). Deferred start and
//! finish transitions (§4.5, §9) are implemented by having the task send
//! itself a follow-up command rather than acting inline: the message goes to
//! the back of its own queue, so it runs on a later iteration of the
//! `recv().await` loop, never on the stack of the callback that triggered
//! it.

use std::sync::Arc;
use std::time::Duration;

use orch_core::error::{JobError, NodeError};
use orch_core::job::{IdMint, JobId, JobKind, JobResult, JobState};
use orch_core::registry::Registry;
use orch_wire::client::ClientMessage;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{info, warn};

use crate::isolate::IsolateAllJob;
use crate::job::{Job, JobStartContext, ReplyOutcome};
use crate::node::{ConnId, Node, NodeConn};
use crate::paths;
use crate::scheduler::JobQueue;

/// Fixed per-node `Isolate` reply timeout (§4.6) — distinct from the
/// configurable client-control-channel IPC timeout.
const RPC_TIMEOUT: Duration = Duration::from_secs(30);

const COMMAND_CHANNEL_CAPACITY: usize = 256;
const SIGNAL_CHANNEL_CAPACITY: usize = 256;

/// Everything that can mutate orchestrator state, or ask to read a snapshot
/// of it. Every variant is handled on the single command-processing task.
pub enum Command {
    /// A peer connection was accepted; add it to the registry, unnamed.
    NodeAccepted { id: ConnId, conn: Arc<NodeConn> },
    /// A peer asked to `Register` under `name`.
    NodeRegister { id: ConnId, name: String, reply: oneshot::Sender<Result<(), NodeError>> },
    /// A peer connection's read loop ended.
    NodeDisconnected { id: ConnId },
    /// A client called `IsolateAll`.
    IsolateAll { target: String, reply: oneshot::Sender<Result<(JobId, String), JobError>> },
    /// A client asked to subscribe to the signal stream.
    Subscribe { reply: oneshot::Sender<broadcast::Receiver<ClientMessage>> },
    /// One dispatched `Isolate` call completed (reply, error, or timeout).
    IsolateReplyReceived { job_id: JobId, result: Result<(), NodeError> },
    /// Deferred: run `try_start` for the queue head (§4.5 `start_head`).
    StartHead,
    /// Deferred: finish and remove `job_id` (§4.5 `finish_head`).
    FinishJob { job_id: JobId },
}

/// A cheaply-`Clone`-able front door onto the orchestrator task, for use by
/// the client control channel and tests.
#[derive(Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::Sender<Command>,
}

impl OrchestratorHandle {
    /// `IsolateAll` (§4.7): enqueues a job and returns its id and object
    /// path, or the error that prevented enqueueing.
    pub async fn isolate_all(&self, target: String) -> Result<(JobId, String), JobError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::IsolateAll { target, reply })
            .await
            .map_err(|_| JobError::NoMemory("orchestrator task is gone".into()))?;
        rx.await.map_err(|_| JobError::NoMemory("orchestrator task is gone".into()))?
    }

    /// Subscribes to the `JobNew`/`JobStateChanged`/`JobRemoved` signal
    /// stream. `None` if the orchestrator task has already shut down.
    pub async fn subscribe(&self) -> Option<broadcast::Receiver<ClientMessage>> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::Subscribe { reply }).await.ok()?;
        rx.await.ok()
    }
}

/// The orchestrator's mutable state and command loop.
pub struct Orchestrator {
    rx: mpsc::Receiver<Command>,
    tx: mpsc::Sender<Command>,
    nodes: Registry<Node>,
    queue: JobQueue,
    mint: IdMint,
    signals: broadcast::Sender<ClientMessage>,
}

impl Orchestrator {
    /// Builds a fresh orchestrator plus a handle for issuing client
    /// commands and the raw command sender the acceptor uses to report node
    /// lifecycle events.
    pub fn new() -> (Self, OrchestratorHandle, mpsc::Sender<Command>) {
        let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (signals, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        let orchestrator = Self {
            rx,
            tx: tx.clone(),
            nodes: Registry::new(),
            queue: JobQueue::new(),
            mint: IdMint::new(),
            signals,
        };
        let handle = OrchestratorHandle { tx: tx.clone() };
        (orchestrator, handle, tx)
    }

    /// Runs the command loop until every sender (including this
    /// orchestrator's own clone) has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            self.handle(cmd).await;
        }
        info!("orchestrator command channel closed, shutting down");
    }

    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::NodeAccepted { id, conn } => {
                self.nodes.add(Node { id, name: None, object_path: None, conn });
            }
            Command::NodeRegister { id, name, reply } => {
                let result = self.register_node(id, name);
                let _ = reply.send(result);
            }
            Command::NodeDisconnected { id } => {
                if let Some(node) = self.nodes.remove_where(|n| n.id == id) {
                    info!(node_id = id, name = ?node.name, "node disconnected, removed from registry");
                }
            }
            Command::IsolateAll { target, reply } => {
                let result = self.enqueue_isolate_all(target);
                let _ = reply.send(result);
            }
            Command::Subscribe { reply } => {
                let _ = reply.send(self.signals.subscribe());
            }
            Command::IsolateReplyReceived { job_id, result } => {
                self.on_reply(job_id, result);
            }
            Command::StartHead => {
                self.queue.clear_transition_pending();
                self.try_start().await;
            }
            Command::FinishJob { job_id } => {
                self.finish(job_id).await;
            }
        }
    }

    /// `Register` (§4.2): fails with `AlreadyRegistered`/`NameTaken` per the
    /// Conflict error kind (§7); on success mutates the node in place so its
    /// position in the registry (and therefore fan-out order) is preserved.
    fn register_node(&mut self, id: ConnId, name: String) -> Result<(), NodeError> {
        if self.nodes.name_taken(&name) {
            return Err(NodeError::NameTaken);
        }
        let node = self.nodes.iter_mut().find(|n| n.id == id).ok_or(NodeError::Disconnected)?;
        if node.name.is_some() {
            return Err(NodeError::AlreadyRegistered);
        }
        node.name = Some(name.clone());
        node.object_path = Some(paths::node_object_path(&name));
        info!(node_id = id, %name, "node registered");
        Ok(())
    }

    /// `IsolateAll` method (§4.7 steps 1–4): allocates an id, enqueues the
    /// job, emits `JobNew` before returning the object path to the caller —
    /// the "signal precedes reply" ordering §4.7/§8 require.
    fn enqueue_isolate_all(&mut self, target: String) -> Result<(JobId, String), JobError> {
        let id = self.mint.next_id();
        let object_path = id.object_path(paths::JOBS_PREFIX);
        let job = Job {
            id,
            kind: JobKind::IsolateAll,
            object_path: object_path.clone(),
            state: JobState::Waiting,
            result: JobResult::Done,
            hooks: Box::new(IsolateAllJob::new(target)),
        };
        self.queue.enqueue(job);
        let _ = self.signals.send(ClientMessage::job_new(id, &object_path));
        self.schedule();
        Ok((id, object_path))
    }

    /// `schedule()` (§4.5): registers a deferred `start_head` if, and only
    /// if, nothing is running and no transition is already pending.
    fn schedule(&mut self) {
        if !self.queue.should_schedule_start() {
            return;
        }
        self.queue.mark_transition_pending();
        self.defer(Command::StartHead);
    }

    /// `try_start` (§4.5): promotes the queue head to Running, emits its
    /// `State` change, and invokes its `start` hook.
    async fn try_start(&mut self) {
        let Some(job_id) = self.queue.start_current() else { return };
        let path = match self.queue.current() {
            Some(job) => job.object_path.clone(),
            None => return,
        };
        let _ = self.signals.send(ClientMessage::job_state_changed(job_id, &path, "running"));

        let nodes: Vec<Arc<NodeConn>> =
            self.nodes.iter().filter(|n| n.name.is_some()).map(|n| n.conn.clone()).collect();
        let ctx =
            JobStartContext { job_id, nodes, cmd_tx: self.tx.clone(), rpc_timeout: RPC_TIMEOUT };

        let Some(job) = self.queue.current_mut() else { return };
        let outcome = job.hooks.start(ctx).await;
        self.apply_outcome(job_id, outcome);
    }

    /// Completion handler for one dispatched `Isolate` call (§4.6).
    fn on_reply(&mut self, job_id: JobId, result: Result<(), NodeError>) {
        let Some(job) = self.queue.current_mut().filter(|j| j.id == job_id) else {
            warn!(%job_id, "late Isolate reply for a job that is no longer current, ignoring");
            return;
        };
        let outcome = job.hooks.on_reply(result);
        self.apply_outcome(job_id, outcome);
    }

    fn apply_outcome(&mut self, job_id: JobId, outcome: ReplyOutcome) {
        if let ReplyOutcome::Finished(result) = outcome {
            if let Some(job) = self.queue.current_mut().filter(|j| j.id == job_id) {
                job.result = result;
            }
            self.schedule_finish(job_id);
        }
    }

    /// Schedules the deferred `finish_head` (§4.5), honouring I3: at most
    /// one transition pending at a time.
    fn schedule_finish(&mut self, job_id: JobId) {
        if self.queue.transition_pending() {
            return;
        }
        self.queue.mark_transition_pending();
        self.defer(Command::FinishJob { job_id });
    }

    /// `finish_head` (§4.5): emits `JobRemoved`, detaches the job, tears it
    /// down, then pulls the next job directly (not re-deferred — it is
    /// already running inside a deferred command).
    async fn finish(&mut self, job_id: JobId) {
        self.queue.clear_transition_pending();
        let Some(mut job) = self.queue.remove_current_if(job_id) else {
            warn!(%job_id, "FinishJob for a job that is not current, ignoring");
            return;
        };
        let _ = self.signals.send(ClientMessage::job_removed(
            job_id,
            &job.object_path,
            job.result.to_string(),
        ));
        job.hooks.teardown();
        info!(%job_id, result = %job.result, "job finished");
        self.try_start().await;
    }

    /// Posts `cmd` back to this task's own channel so it runs on the next
    /// iteration of the command loop rather than on the current call stack.
    fn defer(&self, cmd: Command) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(cmd).await;
        });
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
