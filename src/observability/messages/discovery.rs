// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for project discovery.
//!
//! This module contains message types for logging events related to:
//! * Scanning the setup directory
//! * Accepting or rejecting individual project folders

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The setup directory is missing or not a directory.
///
/// # Log Level
/// `error!` - No project can run
pub struct SetupDirUnavailable<'a> {
    pub path: &'a str,
    pub reason: &'a str,
}

impl Display for SetupDirUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Setup directory '{}' unavailable: {}", self.path, self.reason)
    }
}

impl StructuredLog for SetupDirUnavailable<'_> {
    fn log(&self) {
        tracing::error!(path = self.path, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("setup_dir_unavailable", span_name = name, path = self.path)
    }
}

/// A project folder passed validation.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use coresync::observability::messages::discovery::ProjectAccepted;
///
/// let msg = ProjectAccepted {
///     project: "alpha",
///     file_amount: 5,
///     pattern_count: 2,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ProjectAccepted<'a> {
    pub project: &'a str,
    pub file_amount: usize,
    pub pattern_count: usize,
}

impl Display for ProjectAccepted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Project '{}' accepted: fileAmount={}, {} protection patterns",
            self.project, self.file_amount, self.pattern_count
        )
    }
}

impl StructuredLog for ProjectAccepted<'_> {
    fn log(&self) {
        tracing::info!(
            project = self.project,
            file_amount = self.file_amount,
            pattern_count = self.pattern_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("project_accepted", span_name = name, project = self.project)
    }
}

/// A project folder failed validation and will not run.
///
/// # Log Level
/// `error!` - Configuration problem requiring attention
///
/// # Example
/// ```
/// use coresync::observability::messages::discovery::ProjectRejected;
///
/// let msg = ProjectRejected {
///     project: "beta",
///     problems: "missing 'fileAmount' field; Src folder is empty",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ProjectRejected<'a> {
    pub project: &'a str,
    pub problems: &'a str,
}

impl Display for ProjectRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Project '{}' rejected: {}", self.project, self.problems)
    }
}

impl StructuredLog for ProjectRejected<'_> {
    fn log(&self) {
        tracing::error!(project = self.project, problems = self.problems, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("project_rejected", span_name = name, project = self.project)
    }
}

/// Discovery finished.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DiscoveryCompleted<'a> {
    pub setup_dir: &'a str,
    pub accepted: usize,
    pub rejected: usize,
}

impl Display for DiscoveryCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Discovery in '{}' completed: {} accepted, {} rejected",
            self.setup_dir, self.accepted, self.rejected
        )
    }
}

impl StructuredLog for DiscoveryCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            setup_dir = self.setup_dir,
            accepted = self.accepted,
            rejected = self.rejected,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "discovery",
            span_name = name,
            setup_dir = self.setup_dir,
            accepted = self.accepted,
            rejected = self.rejected,
        )
    }
}
