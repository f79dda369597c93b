// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use crate::config::consts::{OUTPUT_DIR, SOURCE_DIR, STAGING_DIR};

/// Immutable description of one project, built once from a validated folder.
///
/// Every orchestrator owns its own copy; nothing about a project changes while
/// the process runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    /// Folder name, used in logs and artifact ownership
    pub name: String,
    /// Tree copied into the staging workspace on every pass
    pub source_dir: PathBuf,
    /// Ephemeral workspace, wiped at the start of every pass
    pub staging_dir: PathBuf,
    /// Local artifact pool
    pub output_dir: PathBuf,
    /// Destination the output directory is mirrored to
    pub remote_path: String,
    /// Endpoint reporting outstanding remote demand
    pub demand_url: String,
    /// Ordered glob patterns selecting staged files for protection (non-empty)
    pub patterns: Vec<String>,
    /// Target number of artifacts kept locally (> 0)
    pub file_amount: usize,
}

impl ProjectConfig {
    /// Build a project rooted at `root` using the conventional sub-folder layout.
    pub fn from_root(
        name: impl Into<String>,
        root: &Path,
        remote_path: impl Into<String>,
        demand_url: impl Into<String>,
        patterns: Vec<String>,
        file_amount: usize,
    ) -> Self {
        Self {
            name: name.into(),
            source_dir: root.join(SOURCE_DIR),
            staging_dir: root.join(STAGING_DIR),
            output_dir: root.join(OUTPUT_DIR),
            remote_path: remote_path.into(),
            demand_url: demand_url.into(),
            patterns,
            file_amount,
        }
    }
}
