// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::backends::stub::{FixedDemand, RecordingProtector};
use crate::backends::LocalMirror;
use crate::config::{discover_projects, ProjectConfig, RuntimeConfig, TimestampSource};
use crate::engine::OrchestratorFactory;
use crate::observability::metrics::FailureCounters;

/// Scenarios running discovery, orchestration, packaging and a real mirror together
#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    struct Deployment {
        root: tempfile::TempDir,
        remote: PathBuf,
    }

    impl Deployment {
        fn setup_dir(&self) -> PathBuf {
            self.root.path().join("Setup")
        }
    }

    /// One project folder `alpha` with a two-file source tree.
    fn deployment(file_amount: usize) -> Deployment {
        let root = tempfile::tempdir().unwrap();
        let remote = root.path().join("remote").join("alpha");
        let project = root.path().join("Setup").join("alpha");
        fs::create_dir_all(project.join("Src").join("data")).unwrap();
        fs::write(project.join("Src").join("core.dll"), b"core").unwrap();
        fs::write(project.join("Src").join("data").join("level.bin"), b"level").unwrap();

        let manifest = serde_json::json!({
            "vmpFiles": ["*.dll"],
            "remotePath": remote.to_string_lossy(),
            "getNeedURL": "http://demand.local/alpha",
            "fileAmount": file_amount,
        });
        fs::write(project.join("Setup.json"), manifest.to_string()).unwrap();

        Deployment { root, remote }
    }

    fn factory(demand: Arc<FixedDemand>) -> OrchestratorFactory {
        let config = RuntimeConfig {
            timestamp_source: TimestampSource::Modified,
            ..RuntimeConfig::default()
        };
        OrchestratorFactory::new(
            &config,
            Arc::new(RecordingProtector::new()),
            Arc::new(LocalMirror::new()),
            demand,
        )
    }

    fn single_project(d: &Deployment) -> ProjectConfig {
        let mut projects = discover_projects(&d.setup_dir());
        assert_eq!(projects.len(), 1);
        projects.remove(0)
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().unwrap().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn first_cycle_fills_quota_and_mirrors_it() {
        let d = deployment(2);
        let project = single_project(&d);
        let mut orchestrator = factory(Arc::new(FixedDemand::new(0)))
            .build(&project, Arc::new(FailureCounters::new()))
            .unwrap();

        orchestrator.prime().await;
        let report = orchestrator.run_cycle(&CancellationToken::new()).await;

        assert_eq!(report.produced, 2);
        let local = file_names(&project.output_dir);
        assert_eq!(local.len(), 2);
        assert!(local.iter().all(|n| n.starts_with("APG_Run[") && n.ends_with("].zip")));
        assert_eq!(file_names(&d.remote), local);
    }

    #[tokio::test]
    async fn priming_empties_local_pool_and_remote() {
        let d = deployment(3);
        let project = single_project(&d);
        fs::create_dir_all(&project.output_dir).unwrap();
        fs::create_dir_all(&d.remote).unwrap();
        for name in ["APG_Run[old00001].zip", "APG_Run[old00002].zip"] {
            fs::write(project.output_dir.join(name), b"stale").unwrap();
            fs::write(d.remote.join(name), b"stale").unwrap();
        }
        fs::write(d.remote.join("orphan.zip"), b"orphan").unwrap();

        let mut orchestrator = factory(Arc::new(FixedDemand::new(0)))
            .build(&project, Arc::new(FailureCounters::new()))
            .unwrap();
        orchestrator.prime().await;

        assert!(file_names(&project.output_dir).is_empty());
        assert!(file_names(&d.remote).is_empty());
    }

    #[tokio::test]
    async fn overshooting_demand_never_exceeds_quota() {
        let d = deployment(2);
        let project = single_project(&d);
        let mut orchestrator = factory(Arc::new(FixedDemand::new(5)))
            .build(&project, Arc::new(FailureCounters::new()))
            .unwrap();

        orchestrator.prime().await;
        let report = orchestrator.run_cycle(&CancellationToken::new()).await;

        assert_eq!(report.needed, 5);
        assert_eq!(report.produced, 5);
        assert_eq!(file_names(&project.output_dir).len(), 2);
        assert_eq!(file_names(&d.remote), file_names(&project.output_dir));
    }

    #[tokio::test]
    async fn packaged_archive_holds_protected_tree() {
        use std::io::Read;

        let d = deployment(1);
        let project = single_project(&d);
        let mut orchestrator = factory(Arc::new(FixedDemand::new(0)))
            .build(&project, Arc::new(FailureCounters::new()))
            .unwrap();
        orchestrator.prime().await;
        orchestrator.run_cycle(&CancellationToken::new()).await;

        let name = file_names(&project.output_dir).remove(0);
        let file = fs::File::open(project.output_dir.join(name)).unwrap();
        let mut zip = zip::ZipArchive::new(file).unwrap();
        let mut entries: Vec<String> = zip.file_names().map(str::to_string).collect();
        entries.sort();
        assert_eq!(entries, vec!["core.dll", "data/level.bin"]);

        let mut core = Vec::new();
        zip.by_name("core.dll").unwrap().read_to_end(&mut core).unwrap();
        assert_eq!(core, b"core+protected");
        // nested files are never matched
        let mut level = Vec::new();
        zip.by_name("data/level.bin").unwrap().read_to_end(&mut level).unwrap();
        assert_eq!(level, b"level");
    }
}
