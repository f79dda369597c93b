// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the self-update watchdog.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// No divergence between the deployed copy and upstream.
pub struct AlreadyUpToDate;

impl Display for AlreadyUpToDate {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deployed copy is up to date")
    }
}

impl StructuredLog for AlreadyUpToDate {
    fn log(&self) {
        tracing::debug!("{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("up_to_date", span_name = name)
    }
}

/// Upstream has diverged from the deployed copy.
///
/// # Example
/// ```
/// use coresync::observability::messages::watchdog::UpdateDetected;
///
/// let msg = UpdateDetected { local: "1a2b3c4d", remote: "5e6f7a8b" };
/// assert_eq!(msg.to_string(), "Upstream update detected: local 1a2b3c4d, remote 5e6f7a8b");
/// ```
pub struct UpdateDetected<'a> {
    pub local: &'a str,
    pub remote: &'a str,
}

impl Display for UpdateDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Upstream update detected: local {}, remote {}",
            self.local, self.remote
        )
    }
}

impl StructuredLog for UpdateDetected<'_> {
    fn log(&self) {
        tracing::info!(local = self.local, remote = self.remote, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("update_detected", span_name = name, remote = self.remote)
    }
}

/// An update was applied.
pub struct UpdateApplied<'a> {
    pub method: &'a str,
}

impl Display for UpdateApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Update applied via {}", self.method)
    }
}

impl StructuredLog for UpdateApplied<'_> {
    fn log(&self) {
        tracing::info!(method = self.method, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("update_applied", span_name = name, method = self.method)
    }
}

/// Fast-forward failed; a hard reset follows.
pub struct FastForwardFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for FastForwardFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Fast-forward update failed, trying hard reset: {}", self.error)
    }
}

impl StructuredLog for FastForwardFailed<'_> {
    fn log(&self) {
        tracing::warn!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("fast_forward_failed", span_name = name)
    }
}

/// Both update methods failed; polling resumes without a restart.
pub struct UpdateFailed<'a> {
    pub error: &'a dyn std::error::Error,
}

impl Display for UpdateFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Hard reset failed as well, staying on current version: {}", self.error)
    }
}

impl StructuredLog for UpdateFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("update_failed", span_name = name)
    }
}

/// The update check failed.
pub struct CheckFailed<'a> {
    pub error: &'a dyn std::error::Error,
    pub retry_in: Duration,
}

impl Display for CheckFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Update check failed, retrying in {:?}: {}",
            self.retry_in, self.error
        )
    }
}

impl StructuredLog for CheckFailed<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, retry_in_secs = self.retry_in.as_secs(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("check_failed", span_name = name)
    }
}

/// A restart will follow after the grace period.
pub struct RestartScheduled {
    pub grace: Duration,
}

impl Display for RestartScheduled {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Restarting after {:?} grace period", self.grace)
    }
}

impl StructuredLog for RestartScheduled {
    fn log(&self) {
        tracing::info!(grace_secs = self.grace.as_secs(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("restart", span_name = name)
    }
}
