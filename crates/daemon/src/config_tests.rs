// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use std::time::Duration;

fn clear_env() {
    for var in ["ORCHD_STATE_DIR", "XDG_STATE_HOME", "ORCHD_SOCKET_PATH", "ORCHD_NODE_PORT", "ORCHD_IPC_TIMEOUT_MS"]
    {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn defaults_apply_when_unset() {
    clear_env();
    std::env::set_var("ORCHD_STATE_DIR", "/tmp/orchd-test-state");
    let config = Config::load().unwrap();
    assert_eq!(config.node_port, DEFAULT_NODE_PORT);
    assert_eq!(config.ipc_timeout, Duration::from_millis(DEFAULT_IPC_TIMEOUT_MS));
    assert_eq!(config.socket_path, std::path::PathBuf::from("/tmp/orchd-test-state/orchd.sock"));
    clear_env();
}

#[test]
#[serial]
fn explicit_overrides_are_honoured() {
    clear_env();
    std::env::set_var("ORCHD_STATE_DIR", "/tmp/orchd-test-state");
    std::env::set_var("ORCHD_NODE_PORT", "2500");
    std::env::set_var("ORCHD_SOCKET_PATH", "/tmp/custom.sock");
    std::env::set_var("ORCHD_IPC_TIMEOUT_MS", "1500");
    let config = Config::load().unwrap();
    assert_eq!(config.node_port, 2500);
    assert_eq!(config.socket_path, std::path::PathBuf::from("/tmp/custom.sock"));
    assert_eq!(config.ipc_timeout, Duration::from_millis(1500));
    clear_env();
}

#[test]
#[serial]
fn invalid_port_is_rejected() {
    clear_env();
    std::env::set_var("ORCHD_STATE_DIR", "/tmp/orchd-test-state");
    std::env::set_var("ORCHD_NODE_PORT", "not-a-port");
    assert!(matches!(Config::load(), Err(ConfigError::InvalidPort(_))));
    clear_env();
}
