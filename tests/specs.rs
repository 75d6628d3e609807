// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end coverage over the real sockets: a TCP node acceptor and a
//! Unix-domain client control channel, both bound to ephemeral addresses,
//! driving a live `Orchestrator` exactly the way `orchd`'s `main` wires
//! them together.

use std::time::Duration;

use orch_daemon::orchestrator::Orchestrator;
use orch_daemon::{acceptor, client_listener};
use orch_wire::client::{ClientMessage, ClientRequest};
use orch_wire::framing::{read_message, write_message};
use orch_wire::peer::NodeMessage;
use tempfile::tempdir;
use tokio::net::{TcpStream, UnixListener, UnixStream};

const TIMEOUT: Duration = Duration::from_secs(5);

struct Harness {
    node_port: u16,
    client_socket: std::path::PathBuf,
    _state_dir: tempfile::TempDir,
}

async fn start_harness() -> Harness {
    let state_dir = tempdir().unwrap();
    let client_socket = state_dir.path().join("orchd.sock");

    let node_listener = acceptor::bind(0).unwrap();
    let node_port = node_listener.local_addr().unwrap().port();
    let client_listener = UnixListener::bind(&client_socket).unwrap();

    let (orchestrator, handle, cmd_tx) = Orchestrator::new();

    tokio::spawn(orchestrator.run());
    tokio::spawn(acceptor::run(node_listener, cmd_tx, TIMEOUT));
    tokio::spawn(client_listener::run(client_listener, handle, TIMEOUT));

    Harness { node_port, client_socket, _state_dir: state_dir }
}

async fn connect_node(port: u16, name: &str) -> TcpStream {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    write_message(&mut stream, &NodeMessage::Register { name: name.to_string() }, TIMEOUT).await.unwrap();
    match read_message::<NodeMessage, _>(&mut stream, TIMEOUT).await.unwrap() {
        NodeMessage::Reply { ok: true, .. } => stream,
        other => panic!("registration failed: {other:?}"),
    }
}

async fn connect_client(socket: &std::path::Path) -> UnixStream {
    UnixStream::connect(socket).await.unwrap()
}

/// A node accepted over a real TCP connection registers, a client dials
/// `IsolateAll` over a real Unix socket, the fan-out call is answered, and
/// the job runs to completion end to end.
#[tokio::test]
async fn single_node_fan_out_over_real_sockets_completes() {
    let harness = start_harness().await;
    let mut node = connect_node(harness.node_port, "alpha").await;

    let mut client = connect_client(&harness.client_socket).await;
    write_message(&mut client, &ClientRequest::IsolateAll { target: "world".to_string() }, TIMEOUT).await.unwrap();

    match read_message::<NodeMessage, _>(&mut node, TIMEOUT).await.unwrap() {
        NodeMessage::Isolate { target } => assert_eq!(target, "world"),
        other => panic!("expected Isolate, got {other:?}"),
    }
    write_message(&mut node, &NodeMessage::ok_reply(), TIMEOUT).await.unwrap();

    match read_message::<ClientMessage, _>(&mut client, TIMEOUT).await.unwrap() {
        ClientMessage::JobStarted { id, path } => {
            assert_eq!(id, 1);
            assert_eq!(path, "/org/orch/jobs/1");
        }
        other => panic!("expected JobStarted, got {other:?}"),
    }
}

/// A subscriber connected before the call sees the full `JobNew` →
/// `JobStateChanged` → `JobRemoved` lifecycle, and a second node that
/// never replies still lets the job finish once the first node answers,
/// because each node gets its own independent `Isolate` call.
#[tokio::test]
async fn subscriber_observes_the_full_lifecycle_for_a_two_node_fleet() {
    let harness = start_harness().await;
    let mut node_a = connect_node(harness.node_port, "alpha").await;
    let mut node_b = connect_node(harness.node_port, "beta").await;

    let mut watcher = connect_client(&harness.client_socket).await;
    write_message(&mut watcher, &ClientRequest::Subscribe, TIMEOUT).await.unwrap();

    let mut caller = connect_client(&harness.client_socket).await;
    write_message(&mut caller, &ClientRequest::IsolateAll { target: "t".to_string() }, TIMEOUT).await.unwrap();
    match read_message::<ClientMessage, _>(&mut caller, TIMEOUT).await.unwrap() {
        ClientMessage::JobStarted { id, .. } => assert_eq!(id, 1),
        other => panic!("expected JobStarted, got {other:?}"),
    }

    for node in [&mut node_a, &mut node_b] {
        match read_message::<NodeMessage, _>(node, TIMEOUT).await.unwrap() {
            NodeMessage::Isolate { target } => assert_eq!(target, "t"),
            other => panic!("expected Isolate, got {other:?}"),
        }
    }
    write_message(&mut node_a, &NodeMessage::ok_reply(), TIMEOUT).await.unwrap();
    write_message(&mut node_b, &NodeMessage::ok_reply(), TIMEOUT).await.unwrap();

    match read_message::<ClientMessage, _>(&mut watcher, TIMEOUT).await.unwrap() {
        ClientMessage::JobNew { id, path } => {
            assert_eq!(id, 1);
            assert_eq!(path, "/org/orch/jobs/1");
        }
        other => panic!("expected JobNew, got {other:?}"),
    }
    match read_message::<ClientMessage, _>(&mut watcher, TIMEOUT).await.unwrap() {
        ClientMessage::JobStateChanged { id, state, .. } => {
            assert_eq!(id, 1);
            assert_eq!(state, "running");
        }
        other => panic!("expected JobStateChanged, got {other:?}"),
    }
    match read_message::<ClientMessage, _>(&mut watcher, TIMEOUT).await.unwrap() {
        ClientMessage::JobRemoved { id, result, .. } => {
            assert_eq!(id, 1);
            assert_eq!(result, "done");
        }
        other => panic!("expected JobRemoved, got {other:?}"),
    }
}

/// Two nodes registering the same name over the real acceptor: the second
/// registration is rejected but the connection stays usable.
#[tokio::test]
async fn duplicate_node_name_is_rejected_over_the_real_acceptor() {
    let harness = start_harness().await;
    let _first = connect_node(harness.node_port, "alpha").await;

    let mut second = TcpStream::connect(("127.0.0.1", harness.node_port)).await.unwrap();
    write_message(&mut second, &NodeMessage::Register { name: "alpha".to_string() }, TIMEOUT).await.unwrap();
    match read_message::<NodeMessage, _>(&mut second, TIMEOUT).await.unwrap() {
        NodeMessage::Reply { ok: false, code: Some(code), .. } => assert_eq!(code, "AddressInUse"),
        other => panic!("expected a rejected reply, got {other:?}"),
    }

    write_message(&mut second, &NodeMessage::Register { name: "alpha-2".to_string() }, TIMEOUT).await.unwrap();
    match read_message::<NodeMessage, _>(&mut second, TIMEOUT).await.unwrap() {
        NodeMessage::Reply { ok: true, .. } => {}
        other => panic!("expected a successful retry, got {other:?}"),
    }
}
