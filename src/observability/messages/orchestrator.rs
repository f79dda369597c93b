// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the per-project control loop.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Priming finished: pre-existing artifacts purged and the remote re-synced.
pub struct PrimingCompleted<'a> {
    pub project: &'a str,
    pub purged: usize,
}

impl Display for PrimingCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Priming completed: purged {} stale artifacts, remote reset to empty",
            self.purged
        )
    }
}

impl StructuredLog for PrimingCompleted<'_> {
    fn log(&self) {
        tracing::info!(project = self.project, purged = self.purged, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("priming", span_name = name, project = self.project)
    }
}

/// A priming step failed; the loop continues and later passes converge the state.
pub struct PrimingStepFailed<'a> {
    pub project: &'a str,
    pub step: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PrimingStepFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Priming step '{}' failed: {}", self.step, self.error)
    }
}

impl StructuredLog for PrimingStepFailed<'_> {
    fn log(&self) {
        tracing::error!(project = self.project, step = self.step, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("priming_failed", span_name = name, step = self.step)
    }
}

/// Demand snapshot for the current cycle.
///
/// # Log Level
/// `info!` - Emitted once per idle cycle
///
/// # Example
/// ```
/// use coresync::observability::messages::orchestrator::CycleStatus;
///
/// let msg = CycleStatus {
///     project: "alpha",
///     local_count: 5,
///     file_amount: 5,
///     remote_requested: 4,
///     needed: 4,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Local artifacts 5/5, remote requested 4, generating 4"
/// );
/// ```
pub struct CycleStatus<'a> {
    pub project: &'a str,
    pub local_count: usize,
    pub file_amount: usize,
    pub remote_requested: u64,
    pub needed: usize,
}

impl Display for CycleStatus<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Local artifacts {}/{}, remote requested {}, generating {}",
            self.local_count, self.file_amount, self.remote_requested, self.needed
        )
    }
}

impl StructuredLog for CycleStatus<'_> {
    fn log(&self) {
        tracing::info!(
            project = self.project,
            local_count = self.local_count,
            file_amount = self.file_amount,
            remote_requested = self.remote_requested,
            needed = self.needed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "cycle",
            span_name = name,
            project = self.project,
            needed = self.needed,
        )
    }
}

/// Demand could not be read; the cycle proceeds assuming no remote demand.
pub struct DemandUnavailable<'a> {
    pub project: &'a str,
    pub error: &'a dyn std::error::Error,
    pub consecutive_failures: u32,
}

impl Display for DemandUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Demand unavailable ({} consecutive failures), assuming 0 remote demand: {}",
            self.consecutive_failures, self.error
        )
    }
}

impl StructuredLog for DemandUnavailable<'_> {
    fn log(&self) {
        tracing::warn!(
            project = self.project,
            consecutive_failures = self.consecutive_failures,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("demand_unavailable", span_name = name, project = self.project)
    }
}

/// A generation burst ended.
pub struct BurstFinished<'a> {
    pub project: &'a str,
    pub produced: usize,
    pub requested: usize,
    pub failures: &'a str,
}

impl Display for BurstFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Burst finished: {}/{} artifacts produced (failures: {})",
            self.produced, self.requested, self.failures
        )
    }
}

impl StructuredLog for BurstFinished<'_> {
    fn log(&self) {
        tracing::info!(
            project = self.project,
            produced = self.produced,
            requested = self.requested,
            failures = self.failures,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("burst", span_name = name, project = self.project)
    }
}

/// Idle wait before the next cycle.
pub struct IdleWait<'a> {
    pub project: &'a str,
    pub wait: Duration,
}

impl Display for IdleWait<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Waiting {:?} before the next cycle", self.wait)
    }
}

impl StructuredLog for IdleWait<'_> {
    fn log(&self) {
        tracing::debug!(
            project = self.project,
            wait_secs = self.wait.as_secs(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("idle", span_name = name, project = self.project)
    }
}

/// The orchestrator observed the shutdown signal and returned.
pub struct OrchestratorStopped<'a> {
    pub project: &'a str,
}

impl Display for OrchestratorStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Orchestrator for '{}' stopped", self.project)
    }
}

impl StructuredLog for OrchestratorStopped<'_> {
    fn log(&self) {
        tracing::info!(project = self.project, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("stopped", span_name = name, project = self.project)
    }
}
