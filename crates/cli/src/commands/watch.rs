// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use orch_wire::client::{ClientMessage, ClientRequest};
use orch_wire::framing::{read_message, write_message, ProtocolError};
use tokio::net::UnixStream;

/// Long-lived: the subscription stream has no fixed deadline, only the
/// per-frame read does.
const FRAME_TIMEOUT: Duration = Duration::from_secs(3600);

pub async fn run(socket: &Path) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket)
        .await
        .with_context(|| format!("connecting to orchestrator control socket at {}", socket.display()))?;

    write_message(&mut stream, &ClientRequest::Subscribe, Duration::from_secs(10))
        .await
        .context("sending Subscribe")?;

    loop {
        match read_message::<ClientMessage, _>(&mut stream, FRAME_TIMEOUT).await {
            Ok(ClientMessage::JobNew { id, path }) => println!("JobNew({id}, {path})"),
            Ok(ClientMessage::JobStateChanged { id, path, state }) => {
                println!("JobStateChanged({id}, {path}, {state})");
            }
            Ok(ClientMessage::JobRemoved { id, path, result }) => {
                println!("JobRemoved({id}, {path}, {result})");
            }
            Ok(other) => println!("unexpected message: {other:?}"),
            Err(ProtocolError::ConnectionClosed) => return Ok(()),
            Err(e) => return Err(e).context("reading signal stream"),
        }
    }
}
