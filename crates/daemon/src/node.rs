// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node sessions (§3 Node, §4.2).
//!
//! A `Node` is owned exclusively by the orchestrator task, so it needs no
//! `Arc`: nothing else ever holds a reference to the `Node` itself. Its
//! connection (`NodeConn`) is `Arc`-shared instead, since both the
//! connection's own read loop and any spawned `Isolate` dispatch task need
//! concurrent access to the write half for the lifetime of one outstanding
//! call (§9).

use std::sync::Arc;
use std::time::Duration;

use orch_core::error::NodeError;
use orch_core::registry::Named;
use orch_wire::framing::{read_message, write_message, ProtocolError};
use orch_wire::peer::NodeMessage;
use tokio::io::BufReader;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, warn};

use crate::orchestrator::Command;

/// Identifies one accepted peer connection for the lifetime of the process.
/// Not a node *name* — a node has no name until `Register` succeeds.
pub type ConnId = u64;

/// How long to wait for an idle connection to send its next frame before
/// treating it as dead. Generous: nodes only speak when registering or
/// replying to an `Isolate` call, so long silences are normal.
const IDLE_READ_TIMEOUT: Duration = Duration::from_secs(3600);

/// A node's outbound half plus the single reply slot an `Isolate` call is
/// waiting on. At most one call is ever outstanding per node, since at most
/// one job runs at a time (I1) and `IsolateAll` issues one call per node per
/// job — so a single slot, not a correlation-id map, is sufficient.
pub struct NodeConn {
    write: Mutex<OwnedWriteHalf>,
    pending: Mutex<Option<oneshot::Sender<Result<(), NodeError>>>>,
}

impl NodeConn {
    fn new(write: OwnedWriteHalf) -> Arc<Self> {
        Arc::new(Self { write: Mutex::new(write), pending: Mutex::new(None) })
    }

    /// Sends `Isolate(target)` and awaits its reply, bounded by `timeout`
    /// (the fixed 30s in §4.6).
    pub async fn call_isolate(&self, target: &str, timeout: Duration) -> Result<(), NodeError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            if pending.is_some() {
                return Err(NodeError::Rpc("a call is already outstanding on this node".into()));
            }
            *pending = Some(tx);
        }

        {
            let mut write = self.write.lock().await;
            let request = NodeMessage::Isolate { target: target.to_string() };
            if let Err(e) = write_message(&mut *write, &request, timeout).await {
                self.pending.lock().await.take();
                return Err(protocol_to_node_error(e));
            }
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(NodeError::Disconnected),
            Err(_) => {
                self.pending.lock().await.take();
                Err(NodeError::Timeout)
            }
        }
    }

    /// Delivers a reply (or a disconnect/shutdown error) to whichever call
    /// is waiting, if any. A no-op if nothing is outstanding.
    async fn complete_pending(&self, result: Result<(), NodeError>) {
        if let Some(tx) = self.pending.lock().await.take() {
            let _ = tx.send(result);
        }
    }
}

fn protocol_to_node_error(e: ProtocolError) -> NodeError {
    match e {
        ProtocolError::ConnectionClosed => NodeError::Disconnected,
        ProtocolError::Timeout => NodeError::Timeout,
        other => NodeError::Rpc(other.to_string()),
    }
}

/// A peer session (§3, §4.2): `{name?, object_path?, peer}`. Created
/// unnamed on accept; mutated exactly once to acquire a name.
pub struct Node {
    pub id: ConnId,
    pub name: Option<String>,
    pub object_path: Option<String>,
    pub conn: Arc<NodeConn>,
}

impl Named for Node {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Drives one accepted peer connection until disconnect (§4.2, §4.8):
/// reads `Register` and `Reply` frames, forwarding registration requests to
/// the orchestrator task and routing `Reply` frames back to whichever
/// `Isolate` call is outstanding on this node.
pub async fn run_node_connection(
    stream: TcpStream,
    id: ConnId,
    cmd_tx: mpsc::Sender<Command>,
    wire_timeout: Duration,
) {
    let (read_half, write_half) = stream.into_split();
    let conn = NodeConn::new(write_half);

    if cmd_tx.send(Command::NodeAccepted { id, conn: conn.clone() }).await.is_err() {
        return;
    }

    let mut reader = BufReader::new(read_half);
    loop {
        match read_message::<NodeMessage, _>(&mut reader, IDLE_READ_TIMEOUT).await {
            Ok(NodeMessage::Register { name }) => {
                let (reply_tx, reply_rx) = oneshot::channel();
                if cmd_tx.send(Command::NodeRegister { id, name, reply: reply_tx }).await.is_err() {
                    break;
                }
                let reply = match reply_rx.await {
                    Ok(Ok(())) => NodeMessage::ok_reply(),
                    Ok(Err(e)) => NodeMessage::err_reply(e.code(), e.to_string()),
                    Err(_) => break,
                };
                let mut write = conn.write.lock().await;
                if write_message(&mut *write, &reply, wire_timeout).await.is_err() {
                    break;
                }
            }
            Ok(NodeMessage::Reply { ok, code, message }) => {
                let result = if ok {
                    Ok(())
                } else {
                    Err(NodeError::Rpc(message.or(code).unwrap_or_default()))
                };
                conn.complete_pending(result).await;
            }
            Ok(NodeMessage::Isolate { .. }) => {
                warn!(node_id = id, "peer sent Isolate, which only the orchestrator may call");
            }
            Err(ProtocolError::ConnectionClosed) => {
                debug!(node_id = id, "node disconnected");
                break;
            }
            Err(e) => {
                warn!(node_id = id, error = %e, "node connection error, dropping connection");
                break;
            }
        }
    }

    conn.complete_pending(Err(NodeError::Disconnected)).await;
    let _ = cmd_tx.send(Command::NodeDisconnected { id }).await;
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
