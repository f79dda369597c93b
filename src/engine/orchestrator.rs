// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-project control loop.
//!
//! ```text
//! Priming ──► Idle ◄──► Generating
//! ```
//!
//! Priming empties the local pool and mirrors the empty state once. Every Idle
//! cycle snapshots the local count and remote demand, runs a fixed-size burst of
//! passes when anything is needed, then waits. Only cancellation leaves the loop.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::ScheduleConfig;
use crate::engine::demand::{needed_this_cycle, DemandPoller};
use crate::observability::messages::orchestrator::{
    BurstFinished, CycleStatus, DemandUnavailable, IdleWait, OrchestratorStopped,
    PrimingCompleted, PrimingStepFailed,
};
use crate::observability::messages::pipeline::{PassFailed, PassStarted};
use crate::observability::messages::StructuredLog;
use crate::observability::metrics::{FailureCounters, FailureKind};
use crate::pipeline::GenerationPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Priming,
    Idle,
    Generating,
}

/// What one Idle cycle observed and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub local_count: usize,
    /// `None` when demand could not be read and was treated as zero
    pub remote_requested: Option<u64>,
    pub needed: usize,
    pub produced: usize,
}

pub struct ProjectOrchestrator {
    pipeline: GenerationPipeline,
    poller: DemandPoller,
    schedule: ScheduleConfig,
    counters: Arc<FailureCounters>,
    demand_failures: u32,
    phase: Phase,
}

impl ProjectOrchestrator {
    pub fn new(
        pipeline: GenerationPipeline,
        poller: DemandPoller,
        schedule: ScheduleConfig,
        counters: Arc<FailureCounters>,
    ) -> Self {
        Self {
            pipeline,
            poller,
            schedule,
            counters,
            demand_failures: 0,
            phase: Phase::Priming,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn project_name(&self) -> &str {
        &self.pipeline.project().name
    }

    /// Drive the project until `token` is cancelled.
    pub async fn run(mut self, token: CancellationToken) {
        let span = tracing::info_span!("orchestrator", project = %self.project_name());
        async move {
            self.prime().await;

            while !token.is_cancelled() {
                self.run_cycle(&token).await;

                let wait = self.idle_wait();
                IdleWait {
                    project: self.project_name(),
                    wait,
                }
                .log();
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(wait) => {}
                }
            }

            OrchestratorStopped {
                project: self.project_name(),
            }
            .log();
        }
        .instrument(span)
        .await
    }

    /// Empty the local pool and mirror the empty state. Failures are logged;
    /// the loop still proceeds to Idle.
    pub async fn prime(&mut self) {
        self.phase = Phase::Priming;
        let project = self.pipeline.project().name.clone();

        let store = Arc::clone(self.pipeline.store());
        let purged = match tokio::task::spawn_blocking(move || store.purge_all()).await {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => {
                self.priming_failed(&project, "purge", &e, FailureKind::Retention);
                0
            }
            Err(e) => {
                self.priming_failed(&project, "purge", &e, FailureKind::Internal);
                0
            }
        };

        if let Err(e) = self.pipeline.sync_mirror().await {
            self.priming_failed(&project, "mirror", &e, FailureKind::Mirror);
        }

        PrimingCompleted {
            project: &project,
            purged,
        }
        .log();
        self.phase = Phase::Idle;
    }

    /// One Idle cycle: snapshot, decide, and run the burst if anything is needed.
    pub async fn run_cycle(&mut self, token: &CancellationToken) -> CycleReport {
        self.phase = Phase::Idle;
        let project = self.pipeline.project().name.clone();
        let file_amount = self.pipeline.project().file_amount;
        let local_count = self.pipeline.store().count();

        let remote_requested = match self.poller.poll(&self.pipeline.project().demand_url).await {
            Ok(value) => {
                self.demand_failures = 0;
                Some(value)
            }
            Err(e) => {
                self.demand_failures = self.demand_failures.saturating_add(1);
                self.counters.record(FailureKind::Demand);
                DemandUnavailable {
                    project: &project,
                    error: &e,
                    consecutive_failures: self.demand_failures,
                }
                .log();
                None
            }
        };

        let needed = needed_this_cycle(file_amount, local_count, remote_requested.unwrap_or(0));
        CycleStatus {
            project: &project,
            local_count,
            file_amount,
            remote_requested: remote_requested.unwrap_or(0),
            needed,
        }
        .log();

        let produced = if needed > 0 {
            self.run_burst(needed, token).await
        } else {
            0
        };

        CycleReport {
            local_count,
            remote_requested,
            needed,
            produced,
        }
    }

    /// Wait before the next cycle: the base interval, doubled for every
    /// consecutive cycle whose demand poll failed, capped.
    pub fn idle_wait(&self) -> Duration {
        idle_backoff(
            self.schedule.idle_interval(),
            self.schedule.max_idle_backoff(),
            self.demand_failures,
        )
    }

    async fn run_burst(&mut self, needed: usize, token: &CancellationToken) -> usize {
        self.phase = Phase::Generating;
        let project = self.pipeline.project().name.clone();

        let mut produced = 0;
        for pass in 1..=needed {
            if token.is_cancelled() {
                break;
            }
            let span = PassStarted {
                project: &project,
                pass,
                of: needed,
            }
            .span("burst");
            match self.pipeline.run_pass(pass, needed).instrument(span).await {
                Ok(_) => produced += 1,
                Err(e) => {
                    let kind = e.kind();
                    self.counters.record(FailureKind::from_label(kind));
                    PassFailed {
                        project: &project,
                        kind,
                        error: &e,
                    }
                    .log();
                    break;
                }
            }
        }

        BurstFinished {
            project: &project,
            produced,
            requested: needed,
            failures: &self.counters.to_string(),
        }
        .log();
        self.phase = Phase::Idle;
        produced
    }

    fn priming_failed(
        &self,
        project: &str,
        step: &str,
        error: &dyn std::error::Error,
        kind: FailureKind,
    ) {
        self.counters.record(kind);
        PrimingStepFailed {
            project,
            step,
            error,
        }
        .log();
    }
}

/// `base * 2^failures`, never above `max` (and never below `base`).
pub fn idle_backoff(base: Duration, max: Duration, failures: u32) -> Duration {
    let factor = 1u32 << failures.min(16);
    base.saturating_mul(factor).min(max.max(base))
}
