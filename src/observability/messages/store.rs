// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the local artifact pool.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The output directory does not exist (count and eviction degrade to no-ops).
///
/// # Log Level
/// `warn!`
pub struct OutputDirMissing<'a> {
    pub project: &'a str,
    pub path: &'a str,
    pub operation: &'a str,
}

impl Display for OutputDirMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Output directory '{}' is missing or not a directory, cannot {}",
            self.path, self.operation
        )
    }
}

impl StructuredLog for OutputDirMissing<'_> {
    fn log(&self) {
        tracing::warn!(
            project = self.project,
            path = self.path,
            operation = self.operation,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("output_dir_missing", span_name = name, path = self.path)
    }
}

/// Eviction was requested but there is nothing to evict.
///
/// # Log Level
/// `warn!`
pub struct NothingToEvict<'a> {
    pub project: &'a str,
    pub path: &'a str,
}

impl Display for NothingToEvict<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No artifacts to evict in '{}'", self.path)
    }
}

impl StructuredLog for NothingToEvict<'_> {
    fn log(&self) {
        tracing::warn!(project = self.project, path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("nothing_to_evict", span_name = name, path = self.path)
    }
}

/// The oldest artifact was removed.
///
/// # Log Level
/// `info!`
pub struct ArtifactEvicted<'a> {
    pub project: &'a str,
    pub path: &'a str,
}

impl Display for ArtifactEvicted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Evicted oldest artifact '{}'", self.path)
    }
}

impl StructuredLog for ArtifactEvicted<'_> {
    fn log(&self) {
        tracing::info!(project = self.project, path = self.path, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("artifact_evicted", span_name = name, path = self.path)
    }
}

/// All pre-existing artifacts were purged.
///
/// # Log Level
/// `info!`
pub struct PurgeCompleted<'a> {
    pub project: &'a str,
    pub removed: usize,
}

impl Display for PurgeCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Purged {} pre-existing artifacts", self.removed)
    }
}

impl StructuredLog for PurgeCompleted<'_> {
    fn log(&self) {
        tracing::info!(project = self.project, removed = self.removed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("purge", span_name = name, removed = self.removed)
    }
}
