// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node-facing TCP acceptor (§4.8, §6).

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use socket2::{Domain, Socket, Type};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::node::run_node_connection;
use crate::orchestrator::Command;

/// Listen backlog, standing in for `SOMAXCONN` (§6) without depending on a
/// libc binding for the constant.
const LISTEN_BACKLOG: i32 = 1024;

/// Binds the node listener on `0.0.0.0:port` with `SO_REUSEADDR` set,
/// mirroring `create_master_socket` in the source this peer protocol is
/// modeled on.
pub fn bind(port: u16) -> std::io::Result<TcpListener> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    TcpListener::from_std(socket.into())
}

/// Accepts node connections forever, handing each to its own task (§4.8:
/// "construct a new peer server endpoint ... attach the endpoint to the
/// event loop").
pub async fn run(listener: TcpListener, cmd_tx: mpsc::Sender<Command>, wire_timeout: Duration) {
    let next_id = AtomicU64::new(1);
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                info!(node_id = id, %peer_addr, "accepted node connection");
                tokio::spawn(run_node_connection(stream, id, cmd_tx.clone(), wire_timeout));
            }
            Err(e) => {
                warn!(error = %e, "failed to accept node connection");
            }
        }
    }
}
