// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration, resolved from `ORCHD_*` environment variables
//! with sensible defaults (§4.8 ambient).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_NODE_PORT: u16 = 1999;
const DEFAULT_IPC_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a home directory to derive the state directory from")]
    NoHomeDir,

    #[error("ORCHD_NODE_PORT is not a valid port number: {0}")]
    InvalidPort(String),

    #[error("ORCHD_IPC_TIMEOUT_MS is not a valid duration in milliseconds: {0}")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub node_port: u16,
    pub ipc_timeout: Duration,
}

impl Config {
    /// Resolves configuration from the environment, falling back to
    /// sensible defaults for the state directory and socket path.
    pub fn load() -> Result<Self, ConfigError> {
        let state_dir = resolve_state_dir()?;

        let socket_path = std::env::var("ORCHD_SOCKET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| state_dir.join("orchd.sock"));

        let node_port = match std::env::var("ORCHD_NODE_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => DEFAULT_NODE_PORT,
        };

        let ipc_timeout_ms = match std::env::var("ORCHD_IPC_TIMEOUT_MS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidTimeout(raw))?,
            Err(_) => DEFAULT_IPC_TIMEOUT_MS,
        };

        Ok(Self {
            state_dir,
            socket_path,
            node_port,
            ipc_timeout: Duration::from_millis(ipc_timeout_ms),
        })
    }
}

fn resolve_state_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("ORCHD_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("orchd"));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".local/state/orchd"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
