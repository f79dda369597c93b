// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-project failure counters.
//!
//! Each orchestrator owns one [`FailureCounters`]; the counters are reported in
//! every cycle's status line so a failing tool or endpoint is visible without
//! scanning for individual error lines.

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Failure categories tracked per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Staging,
    Protection,
    Packaging,
    Retention,
    Mirror,
    Demand,
    Internal,
}

impl FailureKind {
    /// Map the label produced by [`crate::errors::PipelineError::kind`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "staging" => FailureKind::Staging,
            "protection" => FailureKind::Protection,
            "packaging" => FailureKind::Packaging,
            "retention" => FailureKind::Retention,
            "mirror" => FailureKind::Mirror,
            "demand" => FailureKind::Demand,
            _ => FailureKind::Internal,
        }
    }
}

#[derive(Debug, Default)]
pub struct FailureCounters {
    staging: AtomicU64,
    protection: AtomicU64,
    packaging: AtomicU64,
    retention: AtomicU64,
    mirror: AtomicU64,
    demand: AtomicU64,
    internal: AtomicU64,
}

impl FailureCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, kind: FailureKind) {
        self.counter(kind).fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, kind: FailureKind) -> u64 {
        self.counter(kind).load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        [
            FailureKind::Staging,
            FailureKind::Protection,
            FailureKind::Packaging,
            FailureKind::Retention,
            FailureKind::Mirror,
            FailureKind::Demand,
            FailureKind::Internal,
        ]
        .into_iter()
        .map(|kind| self.get(kind))
        .sum()
    }

    fn counter(&self, kind: FailureKind) -> &AtomicU64 {
        match kind {
            FailureKind::Staging => &self.staging,
            FailureKind::Protection => &self.protection,
            FailureKind::Packaging => &self.packaging,
            FailureKind::Retention => &self.retention,
            FailureKind::Mirror => &self.mirror,
            FailureKind::Demand => &self.demand,
            FailureKind::Internal => &self.internal,
        }
    }
}

impl Display for FailureCounters {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "staging={} protection={} packaging={} retention={} mirror={} demand={} internal={}",
            self.get(FailureKind::Staging),
            self.get(FailureKind::Protection),
            self.get(FailureKind::Packaging),
            self.get(FailureKind::Retention),
            self.get(FailureKind::Mirror),
            self.get(FailureKind::Demand),
            self.get(FailureKind::Internal),
        )
    }
}
