// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for generation passes.
//!
//! This module contains message types for logging events related to:
//! * Pass lifecycle (start, completion, failure)
//! * Staging, protection and packaging steps
//! * Mirror synchronisation

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A generation pass started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use coresync::observability::messages::pipeline::PassStarted;
///
/// let msg = PassStarted {
///     project: "alpha",
///     pass: 2,
///     of: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PassStarted<'a> {
    pub project: &'a str,
    pub pass: usize,
    pub of: usize,
}

impl Display for PassStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Generation pass {}/{} started", self.pass, self.of)
    }
}

impl StructuredLog for PassStarted<'_> {
    fn log(&self) {
        tracing::info!(project = self.project, pass = self.pass, of = self.of, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "generation_pass",
            span_name = name,
            project = self.project,
            pass = self.pass,
            of = self.of,
        )
    }
}

/// The staging workspace was rebuilt from the source tree.
///
/// # Log Level
/// `debug!` - Step detail
pub struct WorkspaceStaged<'a> {
    pub project: &'a str,
    pub path: &'a str,
    pub file_count: usize,
}

impl Display for WorkspaceStaged<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Staged {} files into '{}'", self.file_count, self.path)
    }
}

impl StructuredLog for WorkspaceStaged<'_> {
    fn log(&self) {
        tracing::debug!(
            project = self.project,
            path = self.path,
            file_count = self.file_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("staging", span_name = name, path = self.path)
    }
}

/// A staged file is about to be protected.
///
/// # Log Level
/// `info!`
pub struct ProtectingFile<'a> {
    pub project: &'a str,
    pub path: &'a str,
}

impl Display for ProtectingFile<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Protecting '{}'", self.path)
    }
}

impl StructuredLog for ProtectingFile<'_> {
    fn log(&self) {
        tracing::info!(project = self.project, path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("protect", span_name = name, path = self.path)
    }
}

/// The protection tool reported a failure.
///
/// # Log Level
/// `error!` when the pass aborts, `warn!` when the policy lets it continue
pub struct ProtectionFailed<'a> {
    pub project: &'a str,
    pub path: &'a str,
    pub error: &'a dyn std::error::Error,
    pub continuing: bool,
}

impl Display for ProtectionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Protection of '{}' failed: {}", self.path, self.error)?;
        if self.continuing {
            write!(f, " (continuing, file left unprotected)")?;
        }
        Ok(())
    }
}

impl StructuredLog for ProtectionFailed<'_> {
    fn log(&self) {
        if self.continuing {
            tracing::warn!(project = self.project, path = self.path, error = %self.error, "{}", self);
        } else {
            tracing::error!(project = self.project, path = self.path, error = %self.error, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("protection_failed", span_name = name, path = self.path)
    }
}

/// The staging workspace was packaged into a new artifact.
///
/// # Log Level
/// `info!`
pub struct ArchiveWritten<'a> {
    pub project: &'a str,
    pub path: &'a str,
    pub file_count: usize,
    pub size_bytes: u64,
}

impl Display for ArchiveWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Packaged {} files into '{}' ({} bytes)",
            self.file_count, self.path, self.size_bytes
        )
    }
}

impl StructuredLog for ArchiveWritten<'_> {
    fn log(&self) {
        tracing::info!(
            project = self.project,
            path = self.path,
            file_count = self.file_count,
            size_bytes = self.size_bytes,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("package", span_name = name, path = self.path)
    }
}

/// The remote destination now mirrors the output directory.
///
/// # Log Level
/// `info!`
pub struct MirrorSynced<'a> {
    pub project: &'a str,
    pub remote: &'a str,
    pub duration: Duration,
}

impl Display for MirrorSynced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Mirrored output to '{}' in {:?}", self.remote, self.duration)
    }
}

impl StructuredLog for MirrorSynced<'_> {
    fn log(&self) {
        tracing::info!(
            project = self.project,
            remote = self.remote,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("mirror", span_name = name, remote = self.remote)
    }
}

/// The mirror tool reported a failure.
///
/// # Log Level
/// `error!` when the pass fails, `warn!` when the policy lets it continue
pub struct MirrorSyncFailed<'a> {
    pub project: &'a str,
    pub remote: &'a str,
    pub error: &'a dyn std::error::Error,
    pub continuing: bool,
}

impl Display for MirrorSyncFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Mirror sync to '{}' failed: {}", self.remote, self.error)
    }
}

impl StructuredLog for MirrorSyncFailed<'_> {
    fn log(&self) {
        if self.continuing {
            tracing::warn!(project = self.project, remote = self.remote, error = %self.error, "{}", self);
        } else {
            tracing::error!(project = self.project, remote = self.remote, error = %self.error, "{}", self);
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("mirror_failed", span_name = name, remote = self.remote)
    }
}

/// A generation pass produced and published an artifact.
///
/// # Log Level
/// `info!`
pub struct PassCompleted<'a> {
    pub project: &'a str,
    pub artifact: &'a str,
    pub duration: Duration,
}

impl Display for PassCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Generation pass completed: '{}' in {:?}",
            self.artifact, self.duration
        )
    }
}

impl StructuredLog for PassCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            project = self.project,
            artifact = self.artifact,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("pass_completed", span_name = name, artifact = self.artifact)
    }
}

/// A generation pass was aborted.
///
/// # Log Level
/// `error!`
pub struct PassFailed<'a> {
    pub project: &'a str,
    pub kind: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PassFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Generation pass failed at {}: {}", self.kind, self.error)
    }
}

impl StructuredLog for PassFailed<'_> {
    fn log(&self) {
        tracing::error!(
            project = self.project,
            kind = self.kind,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("pass_failed", span_name = name, kind = self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protection_failure_mentions_policy() {
        let error = std::io::Error::new(std::io::ErrorKind::Other, "exit 3");
        let fail_fast = ProtectionFailed {
            project: "alpha",
            path: "gen/core.dll",
            error: &error,
            continuing: false,
        };
        let best_effort = ProtectionFailed {
            continuing: true,
            ..fail_fast
        };

        assert_eq!(
            fail_fast.to_string(),
            "Protection of 'gen/core.dll' failed: exit 3"
        );
        assert!(best_effort.to_string().ends_with("(continuing, file left unprotected)"));
    }
}
