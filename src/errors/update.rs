// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Failure raised by an update source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// No upstream reference is configured for the deployed copy
    #[error("No remote configured for '{0}'")]
    NotConfigured(String),

    /// The upstream could not be reached
    #[error("Fetch from upstream failed: {0}")]
    Fetch(String),

    /// Applying an update (fast-forward or hard reset) failed
    #[error("Applying update failed: {0}")]
    Apply(String),

    /// Anything else: spawn failures, unreadable output, broken repository state
    #[error("Unexpected update source failure: {0}")]
    Unexpected(String),
}

impl UpdateError {
    /// Operational failures are expected in normal service and keep the regular
    /// polling cadence; everything else backs off.
    pub fn is_operational(&self) -> bool {
        matches!(self, UpdateError::NotConfigured(_) | UpdateError::Fetch(_))
    }
}
