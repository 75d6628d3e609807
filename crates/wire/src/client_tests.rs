// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn isolate_all_round_trips_through_json() {
    let req = ClientRequest::IsolateAll { target: "t".into() };
    let json = serde_json::to_string(&req).unwrap();
    let back: ClientRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(req, back);
}

#[test]
fn subscribe_has_no_payload_fields() {
    let json = serde_json::to_string(&ClientRequest::Subscribe).unwrap();
    assert_eq!(json, r#"{"kind":"Subscribe"}"#);
}

#[test]
fn signal_constructors_produce_expected_variants() {
    let id = JobId(1);
    assert_eq!(
        ClientMessage::job_new(id, "/org/orch/jobs/1"),
        ClientMessage::JobNew { id: 1, path: "/org/orch/jobs/1".into() }
    );
    assert_eq!(
        ClientMessage::job_state_changed(id, "/org/orch/jobs/1", "running"),
        ClientMessage::JobStateChanged {
            id: 1,
            path: "/org/orch/jobs/1".into(),
            state: "running".into()
        }
    );
    assert_eq!(
        ClientMessage::job_removed(id, "/org/orch/jobs/1", "done"),
        ClientMessage::JobRemoved { id: 1, path: "/org/orch/jobs/1".into(), result: "done".into() }
    );
}
