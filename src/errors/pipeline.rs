// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for the artifact store, external transforms and generation passes.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// How a generation pass reacts when an external transform reports failure.
///
/// * `FailFast` - abort the pass; nothing unprotected is ever packaged
/// * `BestEffort` - log, count and continue with the next step
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    FailFast,
    BestEffort,
}

/// Errors from the local artifact pool.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to list artifacts in '{path}': {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove artifact '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by an external transform (protection or mirror tool).
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with status {code:?}: {stderr}")]
    ExitStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("'{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("Transform I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a generation pass did not produce and publish an artifact.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Staging failed for '{path}': {reason}")]
    Staging { path: PathBuf, reason: String },

    #[error("Protection failed for '{path}': {source}")]
    Protection {
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error("Packaging failed for '{path}': {reason}")]
    Packaging { path: PathBuf, reason: String },

    #[error("Retention failed: {0}")]
    Retention(#[from] StoreError),

    #[error("Mirror sync to '{remote}' failed: {source}")]
    Mirror {
        remote: String,
        #[source]
        source: TransformError,
    },

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Short label used for failure counters and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Staging { .. } => "staging",
            PipelineError::Protection { .. } => "protection",
            PipelineError::Packaging { .. } => "packaging",
            PipelineError::Retention(_) => "retention",
            PipelineError::Mirror { .. } => "mirror",
            PipelineError::Join(_) => "internal",
        }
    }
}
