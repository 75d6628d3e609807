// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use orch_wire::client::{ClientMessage, ClientRequest};
use orch_wire::framing::{read_message, write_message};
use tokio::net::UnixStream;

const TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run(socket: &Path, target: String) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket)
        .await
        .with_context(|| format!("connecting to orchestrator control socket at {}", socket.display()))?;

    write_message(&mut stream, &ClientRequest::IsolateAll { target }, TIMEOUT)
        .await
        .context("sending IsolateAll")?;

    match read_message::<ClientMessage, _>(&mut stream, TIMEOUT).await.context("awaiting reply")? {
        ClientMessage::JobStarted { id, path } => {
            println!("job {id} started at {path}");
            Ok(())
        }
        ClientMessage::Error { code, message } => bail!("{code}: {message}"),
        other => bail!("unexpected reply: {other:?}"),
    }
}
