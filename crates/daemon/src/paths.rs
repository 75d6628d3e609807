// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object path constants and derivation (§4.3, §6).

pub const ORCHESTRATOR_OBJECT_PATH: &str = "/org/orch/Orchestrator";
pub const JOBS_PREFIX: &str = "/org/orch/jobs";
pub const NODES_PREFIX: &str = "/org/orch/nodes";

/// Object path for a registered node, derived as `<nodes-prefix>/<name>`.
pub fn node_object_path(name: &str) -> String {
    format!("{NODES_PREFIX}/{name}")
}
