// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fatal startup errors (§7: Fatal). Anything reaching `main` is a reason to
//! exit non-zero; everything else is logged and the offending connection or
//! operation is abandoned (see [`orch_core::error`] for those).

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to create state directory {path}: {source}")]
    StateDir { path: PathBuf, source: std::io::Error },

    #[error("failed to bind node listener on port {port}: {source}")]
    NodeBind { port: u16, source: std::io::Error },

    #[error("failed to bind client control socket {path}: {source}")]
    ClientBind { path: PathBuf, source: std::io::Error },
}
