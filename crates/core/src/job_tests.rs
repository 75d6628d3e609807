// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn id_mint_starts_at_one_and_increases() {
    let mint = IdMint::new();
    assert_eq!(mint.next_id(), JobId(1));
    assert_eq!(mint.next_id(), JobId(2));
    assert_eq!(mint.next_id(), JobId(3));
}

#[test]
fn job_result_defaults_to_done() {
    assert_eq!(JobResult::default(), JobResult::Done);
}

#[test]
fn job_result_string_mapping() {
    assert_eq!(JobResult::Done.to_string(), "done");
    assert_eq!(JobResult::Failed.to_string(), "failed");
    assert_eq!(JobResult::Cancelled.to_string(), "cancelled");
    assert_eq!(JobResult::Timeout.to_string(), "timeout");
}

#[test]
fn job_state_string_mapping() {
    assert_eq!(JobState::Waiting.to_string(), "waiting");
    assert_eq!(JobState::Running.to_string(), "running");
}

#[test]
fn object_path_format() {
    let id = JobId(42);
    assert_eq!(id.object_path("/org/orch/jobs"), "/org/orch/jobs/42");
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Id mint never produces a non-increasing sequence, regardless of
        /// how many ids are drawn (I4).
        #[test]
        fn ids_strictly_increase(n in 1usize..500) {
            let mint = IdMint::new();
            let mut prev = 0u32;
            for _ in 0..n {
                let id = mint.next_id();
                prop_assert!(id.0 > prev);
                prev = id.0;
            }
        }
    }
}
