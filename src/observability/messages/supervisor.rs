// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for task supervision and shutdown.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// The supervisor launched its workers.
pub struct SupervisorStarted {
    pub project_count: usize,
    pub watchdog_enabled: bool,
}

impl Display for SupervisorStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Supervisor started {} project orchestrators (watchdog {})",
            self.project_count,
            if self.watchdog_enabled { "enabled" } else { "disabled" }
        )
    }
}

impl StructuredLog for SupervisorStarted {
    fn log(&self) {
        tracing::info!(
            project_count = self.project_count,
            watchdog_enabled = self.watchdog_enabled,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("supervisor", span_name = name, project_count = self.project_count)
    }
}

/// Nothing to orchestrate.
pub struct NoProjects {
    pub watchdog_enabled: bool,
}

impl Display for NoProjects {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.watchdog_enabled {
            write!(f, "No valid project folders found, only the watchdog will run")
        } else {
            write!(f, "No valid project folders found and the watchdog is disabled, idling until shutdown")
        }
    }
}

impl StructuredLog for NoProjects {
    fn log(&self) {
        tracing::warn!(watchdog_enabled = self.watchdog_enabled, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("no_projects", span_name = name)
    }
}

/// A supervised orchestrator ended unexpectedly and will be restarted.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use coresync::observability::messages::supervisor::OrchestratorCrashed;
/// use std::time::Duration;
///
/// let msg = OrchestratorCrashed {
///     project: "alpha",
///     reason: "task panicked",
///     restart_in: Duration::from_secs(5),
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct OrchestratorCrashed<'a> {
    pub project: &'a str,
    pub reason: &'a str,
    pub restart_in: Duration,
}

impl Display for OrchestratorCrashed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Orchestrator for '{}' crashed: {}; restarting in {:?}",
            self.project, self.reason, self.restart_in
        )
    }
}

impl StructuredLog for OrchestratorCrashed<'_> {
    fn log(&self) {
        tracing::error!(
            project = self.project,
            reason = self.reason,
            restart_in_secs = self.restart_in.as_secs(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("orchestrator_crashed", span_name = name, project = self.project)
    }
}

/// Shutdown requested; workers are being drained.
pub struct ShutdownRequested<'a> {
    pub reason: &'a str,
    pub grace: Duration,
}

impl Display for ShutdownRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Shutdown requested ({}), waiting up to {:?} for workers",
            self.reason, self.grace
        )
    }
}

impl StructuredLog for ShutdownRequested<'_> {
    fn log(&self) {
        tracing::info!(reason = self.reason, grace_secs = self.grace.as_secs(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("shutdown", span_name = name, reason = self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_projects_reflects_watchdog_state() {
        let with = NoProjects { watchdog_enabled: true }.to_string();
        let without = NoProjects { watchdog_enabled: false }.to_string();
        assert!(with.contains("only the watchdog will run"));
        assert!(without.contains("watchdog is disabled"));
        assert!(!without.contains("will run"));
    }
}
