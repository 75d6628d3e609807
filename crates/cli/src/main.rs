// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `orchctl`: a thin client for the orchestrator's control channel.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orchctl", about = "Issue commands to, and watch signals from, an orchestrator")]
struct Cli {
    /// Path to the orchestrator's control socket. Defaults to the same
    /// resolution `orchd` itself uses (`ORCHD_SOCKET_PATH`, state dir, ...).
    #[arg(long, global = true)]
    socket: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch `Isolate` to every registered node and print the new job's
    /// object path.
    IsolateAll { target: String },
    /// Subscribe to the signal stream and print each event as it arrives.
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let socket = match cli.socket {
        Some(path) => path,
        None => orch_daemon::config::Config::load()?.socket_path,
    };

    match cli.command {
        Command::IsolateAll { target } => commands::isolate_all::run(&socket, target).await,
        Command::Watch => commands::watch::run(&socket).await,
    }
}
