// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One generation pass: stage, protect, package, retain, mirror.
//!
//! Passes of one project run strictly one after another. Filesystem work runs on
//! the blocking pool; the protection and mirror tools are awaited through their
//! transform traits. How a failing tool affects the pass is decided by the
//! configured [`FailurePolicy`].

pub mod matcher;
pub mod package;
pub mod staging;

pub use matcher::PatternSet;
pub use package::{package_dir, ArchiveSummary};
pub use staging::stage_workspace;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::config::consts::DEFAULT_ARTIFACT_PREFIX;
use crate::config::{ProjectConfig, RuntimeConfig};
use crate::errors::{ConfigError, FailurePolicy, PipelineError};
use crate::observability::messages::pipeline::{
    ArchiveWritten, MirrorSyncFailed, MirrorSynced, PassCompleted, PassStarted, ProtectingFile,
    ProtectionFailed, WorkspaceStaged,
};
use crate::observability::messages::StructuredLog;
use crate::observability::metrics::{FailureCounters, FailureKind};
use crate::store::{artifact_file_name, ArtifactStore};
use crate::traits::{MirrorTransform, ProtectionTransform};

/// Settings shared by every pass of every project.
#[derive(Debug, Clone)]
pub struct PassOptions {
    pub artifact_prefix: String,
    pub failure_policy: FailurePolicy,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl From<&RuntimeConfig> for PassOptions {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            artifact_prefix: config.artifact_prefix.clone(),
            failure_policy: config.failure_policy,
        }
    }
}

pub struct GenerationPipeline {
    project: ProjectConfig,
    patterns: PatternSet,
    store: Arc<ArtifactStore>,
    protector: Arc<dyn ProtectionTransform>,
    mirror: Arc<dyn MirrorTransform>,
    options: PassOptions,
    counters: Arc<FailureCounters>,
}

impl GenerationPipeline {
    pub fn new(
        project: ProjectConfig,
        store: Arc<ArtifactStore>,
        protector: Arc<dyn ProtectionTransform>,
        mirror: Arc<dyn MirrorTransform>,
        options: PassOptions,
        counters: Arc<FailureCounters>,
    ) -> Result<Self, ConfigError> {
        let patterns = PatternSet::compile(&project.patterns).map_err(|e| {
            ConfigError::Invalid(format!(
                "project '{}' has an invalid protection pattern: {}",
                project.name, e.msg
            ))
        })?;

        Ok(Self {
            project,
            patterns,
            store,
            protector,
            mirror,
            options,
            counters,
        })
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn store(&self) -> &Arc<ArtifactStore> {
        &self.store
    }

    /// Run one full pass. Returns the path of the artifact it produced.
    ///
    /// `pass` and `of` only label the log lines of a burst.
    pub async fn run_pass(&self, pass: usize, of: usize) -> Result<PathBuf, PipelineError> {
        let project = self.project.name.as_str();
        let started = Instant::now();
        PassStarted { project, pass, of }.log();

        // stage
        let source = self.project.source_dir.clone();
        let staging = self.project.staging_dir.clone();
        let staged =
            tokio::task::spawn_blocking(move || stage_workspace(&source, &staging)).await??;
        WorkspaceStaged {
            project,
            path: &self.project.staging_dir.display().to_string(),
            file_count: staged,
        }
        .log();

        // protect
        let staging = self.project.staging_dir.clone();
        let patterns = self.patterns.clone();
        let targets = tokio::task::spawn_blocking(move || patterns.select(&staging))
            .await?
            .map_err(|e| PipelineError::Staging {
                path: self.project.staging_dir.clone(),
                reason: format!("could not list workspace: {}", e),
            })?;
        for target in targets {
            self.protect_one(target).await?;
        }

        // package
        let staging = self.project.staging_dir.clone();
        let dest = self
            .project
            .output_dir
            .join(artifact_file_name(&self.options.artifact_prefix));
        let archive_path = dest.clone();
        let summary = tokio::task::spawn_blocking(move || package_dir(&staging, &dest)).await??;
        ArchiveWritten {
            project,
            path: &archive_path.display().to_string(),
            file_count: summary.file_count,
            size_bytes: summary.size_bytes,
        }
        .log();

        // retain
        let store = Arc::clone(&self.store);
        let limit = self.project.file_amount;
        tokio::task::spawn_blocking(move || store.enforce_capacity(limit)).await??;

        // mirror
        match self.sync_mirror().await {
            Ok(()) => {}
            Err(e) if self.options.failure_policy == FailurePolicy::BestEffort => {
                self.counters.record(FailureKind::Mirror);
                tracing::debug!(project, error = %e, "Continuing after mirror failure");
            }
            Err(e) => return Err(e),
        }

        PassCompleted {
            project,
            artifact: &archive_path.display().to_string(),
            duration: started.elapsed(),
        }
        .log();
        Ok(archive_path)
    }

    /// Make the remote destination mirror the output directory.
    pub async fn sync_mirror(&self) -> Result<(), PipelineError> {
        let project = self.project.name.as_str();
        let remote = self.project.remote_path.as_str();
        let started = Instant::now();

        match self.mirror.mirror(self.store.dir(), remote).await {
            Ok(()) => {
                MirrorSynced {
                    project,
                    remote,
                    duration: started.elapsed(),
                }
                .log();
                Ok(())
            }
            Err(source) => {
                MirrorSyncFailed {
                    project,
                    remote,
                    error: &source,
                    continuing: self.options.failure_policy == FailurePolicy::BestEffort,
                }
                .log();
                Err(PipelineError::Mirror {
                    remote: remote.to_string(),
                    source,
                })
            }
        }
    }

    async fn protect_one(&self, target: PathBuf) -> Result<(), PipelineError> {
        let project = self.project.name.as_str();
        let display = target.display().to_string();
        ProtectingFile {
            project,
            path: &display,
        }
        .log();

        let Err(source) = self.protector.protect(&target).await else {
            return Ok(());
        };

        let continuing = self.options.failure_policy == FailurePolicy::BestEffort;
        ProtectionFailed {
            project,
            path: &display,
            error: &source,
            continuing,
        }
        .log();

        if continuing {
            self.counters.record(FailureKind::Protection);
            Ok(())
        } else {
            Err(PipelineError::Protection {
                path: target,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{RecordingMirror, RecordingProtector};
    use crate::config::TimestampSource;
    use std::fs;
    use std::io::Read;
    use std::path::Path;

    struct Fixture {
        _root: tempfile::TempDir,
        project: ProjectConfig,
        protector: Arc<RecordingProtector>,
        mirror: Arc<RecordingMirror>,
        counters: Arc<FailureCounters>,
    }

    fn fixture(file_amount: usize, patterns: &[&str]) -> Fixture {
        let root = tempfile::tempdir().unwrap();
        let project = ProjectConfig::from_root(
            "alpha",
            root.path(),
            "/srv/alpha",
            "http://demand.local/alpha",
            patterns.iter().map(|p| p.to_string()).collect(),
            file_amount,
        );
        fs::create_dir_all(&project.source_dir).unwrap();
        fs::write(project.source_dir.join("core.dll"), b"core").unwrap();
        fs::write(project.source_dir.join("readme.txt"), b"docs").unwrap();

        Fixture {
            _root: root,
            project,
            protector: Arc::new(RecordingProtector::new()),
            mirror: Arc::new(RecordingMirror::new()),
            counters: Arc::new(FailureCounters::new()),
        }
    }

    fn pipeline(f: &Fixture, policy: FailurePolicy) -> GenerationPipeline {
        let store = Arc::new(ArtifactStore::new(
            f.project.name.clone(),
            f.project.output_dir.clone(),
            TimestampSource::Modified,
        ));
        GenerationPipeline::new(
            f.project.clone(),
            store,
            f.protector.clone(),
            f.mirror.clone(),
            PassOptions {
                failure_policy: policy,
                ..PassOptions::default()
            },
            f.counters.clone(),
        )
        .unwrap()
    }

    fn archived(path: &Path, name: &str) -> Vec<u8> {
        let mut zip = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
        let mut entry = zip.by_name(name).unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        bytes
    }

    #[tokio::test]
    async fn pass_protects_packages_and_mirrors() {
        let f = fixture(3, &["*.dll"]);
        let pipeline = pipeline(&f, FailurePolicy::FailFast);

        let artifact = pipeline.run_pass(1, 1).await.unwrap();

        assert!(artifact.starts_with(&f.project.output_dir));
        assert_eq!(
            f.protector.calls(),
            vec![f.project.staging_dir.join("core.dll")]
        );
        assert_eq!(archived(&artifact, "core.dll"), b"core+protected");
        assert_eq!(archived(&artifact, "readme.txt"), b"docs");
        assert_eq!(f.mirror.calls(), vec![(f.project.output_dir.clone(), "/srv/alpha".to_string())]);
        // source tree is never touched
        assert_eq!(fs::read(f.project.source_dir.join("core.dll")).unwrap(), b"core");
    }

    #[tokio::test]
    async fn fail_fast_never_packages_unprotected_files() {
        let f = fixture(3, &["*.dll"]);
        f.protector.set_failing(true);
        let pipeline = pipeline(&f, FailurePolicy::FailFast);

        let err = pipeline.run_pass(1, 1).await.unwrap_err();

        assert_eq!(err.kind(), "protection");
        assert_eq!(pipeline.store().count(), 0);
        assert!(f.mirror.calls().is_empty());
    }

    #[tokio::test]
    async fn best_effort_packages_despite_protection_failure() {
        let f = fixture(3, &["*.dll"]);
        f.protector.set_failing(true);
        let pipeline = pipeline(&f, FailurePolicy::BestEffort);

        let artifact = pipeline.run_pass(1, 1).await.unwrap();

        assert_eq!(archived(&artifact, "core.dll"), b"core");
        assert_eq!(f.counters.get(FailureKind::Protection), 1);
        assert_eq!(f.mirror.calls().len(), 1);
    }

    #[tokio::test]
    async fn mirror_failure_keeps_artifact_local() {
        let f = fixture(3, &[]);
        f.mirror.set_failing(true);

        let strict = pipeline(&f, FailurePolicy::FailFast);
        let err = strict.run_pass(1, 1).await.unwrap_err();
        assert_eq!(err.kind(), "mirror");
        assert_eq!(strict.store().count(), 1);

        let lenient = pipeline(&f, FailurePolicy::BestEffort);
        lenient.run_pass(1, 1).await.unwrap();
        assert_eq!(lenient.store().count(), 2);
        assert_eq!(f.counters.get(FailureKind::Mirror), 1);
    }

    #[tokio::test]
    async fn retention_holds_pool_at_file_amount() {
        let f = fixture(2, &[]);
        let pipeline = pipeline(&f, FailurePolicy::FailFast);

        for pass in 1..=4 {
            pipeline.run_pass(pass, 4).await.unwrap();
            assert!(pipeline.store().count() <= 2);
        }
        assert_eq!(pipeline.store().count(), 2);
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let f = fixture(1, &["[oops"]);
        let store = Arc::new(ArtifactStore::new("alpha", "/tmp/none", TimestampSource::Modified));
        let result = GenerationPipeline::new(
            f.project.clone(),
            store,
            f.protector.clone(),
            f.mirror.clone(),
            PassOptions::default(),
            f.counters.clone(),
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
