// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job identifier and lifecycle state.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// Unique, monotonically increasing identifier for a job instance.
///
/// Unlike most ids in this codebase's lineage (random nanoids), job ids must
/// be strictly increasing and never reused within a single daemon run (I4),
/// so a plain counter is the only implementation that satisfies the
/// invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u32);

impl JobId {
    /// Object path for this job under the jobs prefix.
    pub fn object_path(&self, jobs_prefix: &str) -> String {
        format!("{jobs_prefix}/{}", self.0)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates strictly increasing job ids, starting at 1.
///
/// The counter does not wrap within any realistic run; overflow past
/// `u32::MAX` panics in debug builds and saturates in release.
#[derive(Debug, Default)]
pub struct IdMint {
    next: AtomicU32,
}

impl IdMint {
    pub fn new() -> Self {
        Self { next: AtomicU32::new(0) }
    }

    /// Returns the next id: `++next_job_id`.
    pub fn next_id(&self) -> JobId {
        let id = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        debug_assert!(id != 0, "job id counter wrapped");
        JobId(id)
    }
}

/// State of a job on the orchestrator's single-threaded scheduler.
///
/// There is no externally visible "Done" state: completion is signalled by
/// the job's object disappearing together with a `JobRemoved` signal
/// carrying the result (see [`JobResult`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Waiting,
    Running,
}

crate::simple_display! {
    JobState {
        Waiting => "waiting",
        Running => "running",
    }
}

/// Outcome of a finished job, set before removal. Defaults to `Done` if
/// never explicitly set by a job's completion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobResult {
    #[default]
    Done,
    Failed,
    Cancelled,
    Timeout,
}

crate::simple_display! {
    JobResult {
        Done => "done",
        Failed => "failed",
        Cancelled => "cancelled",
        Timeout => "timeout",
    }
}

/// Tag identifying the kind of command a job carries out.
///
/// A single variant today (`IsolateAll`); additional fan-out commands would
/// add variants here the same way the daemon's job-kind dispatch does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    IsolateAll,
}

crate::simple_display! {
    JobKind {
        IsolateAll => "isolate_all",
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
