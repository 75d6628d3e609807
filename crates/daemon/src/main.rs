// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use orch_daemon::config::Config;
use orch_daemon::error::DaemonError;
use orch_daemon::orchestrator::Orchestrator;
use orch_daemon::{acceptor, client_listener};
use tokio::net::UnixListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orchd", about = "Fleet orchestrator daemon")]
struct Args;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let _args = Args::parse();

    if let Err(e) = run().await {
        error!(error = %e, "orchd exiting with a fatal error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DaemonError> {
    let config = Config::load()?;

    std::fs::create_dir_all(&config.state_dir)
        .map_err(|source| DaemonError::StateDir { path: config.state_dir.clone(), source })?;

    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    let client_listener = UnixListener::bind(&config.socket_path)
        .map_err(|source| DaemonError::ClientBind { path: config.socket_path.clone(), source })?;
    info!(path = %config.socket_path.display(), "listening for clients");

    let node_listener = acceptor::bind(config.node_port)
        .map_err(|source| DaemonError::NodeBind { port: config.node_port, source })?;
    info!(port = config.node_port, "listening for nodes");

    let (orchestrator, handle, cmd_tx) = Orchestrator::new();
    let orchestrator_task = tokio::spawn(orchestrator.run());
    let acceptor_task = tokio::spawn(acceptor::run(node_listener, cmd_tx, config.ipc_timeout));
    let client_task = tokio::spawn(client_listener::run(client_listener, handle, config.ipc_timeout));

    tokio::select! {
        () = wait_for_shutdown_signal() => {
            info!("received shutdown signal");
        }
        result = orchestrator_task => {
            if let Err(e) = result {
                error!(error = %e, "orchestrator task panicked");
            }
        }
    }

    acceptor_task.abort();
    client_task.abort();
    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to install SIGTERM handler");
            std::future::pending::<()>().await;
            unreachable!()
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
