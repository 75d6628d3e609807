// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal reference node agent: connects to an orchestrator, registers
//! under a name, and replies to `Isolate` calls according to a configurable
//! policy. Exists for local testing and demos, not as a production node
//! implementation.

use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use orch_wire::framing::{read_message, write_message};
use orch_wire::peer::NodeMessage;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "node-sim", about = "Minimal reference node agent for local testing")]
struct Args {
    /// Name to register under.
    #[arg(long)]
    name: String,

    /// Orchestrator node-listener address.
    #[arg(long, default_value = "127.0.0.1:1999")]
    addr: String,

    /// Milliseconds to wait before replying to an `Isolate` call.
    #[arg(long, default_value_t = 0)]
    reply_delay_ms: u64,

    /// Never reply to `Isolate`, to exercise the 30s timeout path.
    #[arg(long)]
    never_reply: bool,
}

const WIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let stream = TcpStream::connect(&args.addr).await.context("connecting to orchestrator")?;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_message(&mut write_half, &NodeMessage::Register { name: args.name.clone() }, WIRE_TIMEOUT)
        .await
        .context("sending Register")?;
    match read_message::<NodeMessage, _>(&mut reader, WIRE_TIMEOUT).await.context("awaiting Register reply")? {
        NodeMessage::Reply { ok: true, .. } => info!(name = %args.name, "registered"),
        NodeMessage::Reply { ok: false, code, message } => {
            return Err(anyhow!("registration failed: {code:?} {message:?}"));
        }
        other => return Err(anyhow!("unexpected reply to Register: {other:?}")),
    }

    loop {
        match read_message::<NodeMessage, _>(&mut reader, Duration::from_secs(3600)).await {
            Ok(NodeMessage::Isolate { target }) => {
                info!(%target, "received Isolate");
                if args.never_reply {
                    continue;
                }
                if args.reply_delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(args.reply_delay_ms)).await;
                }
                if write_message(&mut write_half, &NodeMessage::ok_reply(), WIRE_TIMEOUT).await.is_err() {
                    break;
                }
            }
            Ok(other) => warn!(?other, "ignoring unexpected message"),
            Err(e) => {
                warn!(error = %e, "connection error, exiting");
                break;
            }
        }
    }

    Ok(())
}
