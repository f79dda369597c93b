// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Local artifact pool for one project.
//!
//! The store only ever looks at regular files directly inside the output
//! directory; subdirectories and other entries are invisible to counting and
//! eviction. Artifacts are ordered oldest first by timestamp, ties broken by
//! path so eviction order is reproducible.

mod naming;

pub use naming::{artifact_file_name, random_token};

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::TimestampSource;
use crate::errors::StoreError;
use crate::observability::messages::store::{
    ArtifactEvicted, NothingToEvict, OutputDirMissing, PurgeCompleted,
};
use crate::observability::messages::StructuredLog;

/// One packaged output file. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub project: String,
}

/// Sort artifacts oldest first; equal timestamps fall back to path order.
pub fn sort_oldest_first(artifacts: &mut [Artifact]) {
    artifacts.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.path.cmp(&b.path))
    });
}

pub struct ArtifactStore {
    project: String,
    dir: PathBuf,
    timestamps: TimestampSource,
}

impl ArtifactStore {
    pub fn new(project: impl Into<String>, dir: impl Into<PathBuf>, timestamps: TimestampSource) -> Self {
        Self {
            project: project.into(),
            dir: dir.into(),
            timestamps,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Current artifacts, oldest first. An absent directory yields `None`.
    pub fn list(&self) -> Result<Option<Vec<Artifact>>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(None);
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|source| StoreError::List {
            path: self.dir.clone(),
            source,
        })?;

        let mut artifacts = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::List {
                path: self.dir.clone(),
                source,
            })?;
            // symlinks and directories are not artifacts
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            artifacts.push(Artifact {
                path: entry.path(),
                created_at: self.timestamp_of(&metadata),
                project: self.project.clone(),
            });
        }

        sort_oldest_first(&mut artifacts);
        Ok(Some(artifacts))
    }

    /// Number of artifacts; 0 with a warning when the directory is absent or unreadable.
    pub fn count(&self) -> usize {
        match self.list() {
            Ok(Some(artifacts)) => artifacts.len(),
            Ok(None) => {
                self.warn_missing("count artifacts");
                0
            }
            Err(e) => {
                tracing::warn!(project = %self.project, error = %e, "Failed to count artifacts");
                0
            }
        }
    }

    /// Remove the single oldest artifact. No-op with a warning when there is none.
    pub fn evict_oldest(&self) -> Result<Option<Artifact>, StoreError> {
        let Some(artifacts) = self.list()? else {
            self.warn_missing("evict the oldest artifact");
            return Ok(None);
        };
        let Some(oldest) = artifacts.into_iter().next() else {
            NothingToEvict {
                project: &self.project,
                path: &self.dir.display().to_string(),
            }
            .log();
            return Ok(None);
        };
        self.remove(&oldest)?;
        Ok(Some(oldest))
    }

    /// Evict until the directory holds no artifacts. Returns how many were removed.
    pub fn purge_all(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        while let Some(artifacts) = self.list()? {
            let Some(oldest) = artifacts.into_iter().next() else {
                break;
            };
            self.remove(&oldest)?;
            removed += 1;
        }

        PurgeCompleted {
            project: &self.project,
            removed,
        }
        .log();
        Ok(removed)
    }

    /// After adding an artifact: if the pool is over `limit`, evict exactly one.
    pub fn enforce_capacity(&self, limit: usize) -> Result<Option<Artifact>, StoreError> {
        if self.count() > limit {
            self.evict_oldest()
        } else {
            Ok(None)
        }
    }

    fn remove(&self, artifact: &Artifact) -> Result<(), StoreError> {
        std::fs::remove_file(&artifact.path).map_err(|source| StoreError::Remove {
            path: artifact.path.clone(),
            source,
        })?;
        ArtifactEvicted {
            project: &self.project,
            path: &artifact.path.display().to_string(),
        }
        .log();
        Ok(())
    }

    fn timestamp_of(&self, metadata: &std::fs::Metadata) -> DateTime<Utc> {
        let time = match self.timestamps {
            TimestampSource::Created => metadata.created().or_else(|_| metadata.modified()),
            TimestampSource::Modified => metadata.modified(),
        };
        DateTime::<Utc>::from(time.unwrap_or(SystemTime::UNIX_EPOCH))
    }

    fn warn_missing(&self, operation: &str) {
        OutputDirMissing {
            project: &self.project,
            path: &self.dir.display().to_string(),
            operation,
        }
        .log();
    }
}
