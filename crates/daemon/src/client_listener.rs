// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The client control channel (§2 item 10, §4.7, §6): a Unix domain socket
//! standing in for "the per-user message bus." Each connection handles
//! exactly one [`ClientRequest`] before closing (method call) or upgrading
//! into an indefinite signal stream (`Subscribe`).

use std::time::Duration;

use orch_wire::client::{ClientMessage, ClientRequest};
use orch_wire::framing::{read_message, write_message, ProtocolError};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::orchestrator::OrchestratorHandle;

/// Accepts client connections forever, handing each to its own task.
pub async fn run(listener: UnixListener, orchestrator: OrchestratorHandle, ipc_timeout: Duration) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    handle_connection(stream, orchestrator, ipc_timeout).await;
                });
            }
            Err(e) => {
                warn!(error = %e, "failed to accept client connection");
            }
        }
    }
}

async fn handle_connection(mut stream: UnixStream, orchestrator: OrchestratorHandle, ipc_timeout: Duration) {
    let request = match read_message::<ClientRequest, _>(&mut stream, ipc_timeout).await {
        Ok(request) => request,
        Err(ProtocolError::ConnectionClosed) => return,
        Err(e) => {
            warn!(error = %e, "client control channel read error");
            return;
        }
    };

    match request {
        ClientRequest::IsolateAll { target } => {
            // §4.7: JobNew is emitted inside `isolate_all` (on the
            // orchestrator task, before it replies to this call), so the
            // subscriber ordering guarantee holds without this connection
            // racing its own signal subscription.
            let reply = match orchestrator.isolate_all(target).await {
                Ok((id, path)) => ClientMessage::JobStarted { id: id.0, path },
                Err(e) => ClientMessage::Error { code: e.code().to_string(), message: e.to_string() },
            };
            let _ = write_message(&mut stream, &reply, ipc_timeout).await;
        }
        ClientRequest::Subscribe => {
            let Some(mut signals) = orchestrator.subscribe().await else {
                return;
            };
            loop {
                match signals.recv().await {
                    Ok(message) => {
                        if write_message(&mut stream, &message, ipc_timeout).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "client subscriber lagged, some signals were dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!("client subscriber disconnected");
        }
    }
}

#[cfg(test)]
#[path = "client_listener_tests.rs"]
mod tests;
