// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use crate::backends::process::run_tool;
use crate::errors::{TransformError, UpdateError};
use crate::traits::{UpdateSource, UpdateStatus};

const REMOTE: &str = "origin";
const BRANCH_CANDIDATES: [&str; 2] = ["origin/master", "origin/main"];
const GIT_TIMEOUT: Duration = Duration::from_secs(120);

/// Update source backed by the `git` CLI in the deployed working copy.
pub struct GitUpdateSource {
    repo_dir: PathBuf,
}

impl GitUpdateSource {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String, TransformError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let output = run_tool("git", &args, Some(&self.repo_dir), Some(GIT_TIMEOUT)).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// `origin/master` when it exists, otherwise `origin/main`.
    async fn remote_branch(&self) -> Result<&'static str, UpdateError> {
        for candidate in BRANCH_CANDIDATES {
            if self
                .git(&["rev-parse", "--verify", "--quiet", candidate])
                .await
                .is_ok()
            {
                return Ok(candidate);
            }
        }
        Err(UpdateError::Unexpected(format!(
            "none of {:?} exist in '{}'",
            BRANCH_CANDIDATES,
            self.repo_dir.display()
        )))
    }

    async fn rev(&self, reference: &str) -> Result<String, UpdateError> {
        self.git(&["rev-parse", reference])
            .await
            .map_err(|e| UpdateError::Unexpected(e.to_string()))
    }
}

impl GitUpdateSource {
    async fn contains(&self, commit: &str) -> bool {
        self.git(&["merge-base", "--is-ancestor", commit, "HEAD"])
            .await
            .is_ok()
    }
}

fn short(hash: &str) -> String {
    hash.chars().take(7).collect()
}

#[async_trait]
impl UpdateSource for GitUpdateSource {
    async fn check(&self) -> Result<UpdateStatus, UpdateError> {
        let remotes = self
            .git(&["remote"])
            .await
            .map_err(|e| UpdateError::Unexpected(e.to_string()))?;
        if !remotes.lines().any(|r| r.trim() == REMOTE) {
            return Err(UpdateError::NotConfigured(
                self.repo_dir.display().to_string(),
            ));
        }

        self.git(&["fetch", REMOTE])
            .await
            .map_err(|e| UpdateError::Fetch(e.to_string()))?;

        let branch = self.remote_branch().await?;
        let local = self.rev("HEAD").await?;
        let remote = self.rev(branch).await?;

        // a deployed copy already containing the remote tip has nothing to pull
        if local == remote || self.contains(&remote).await {
            Ok(UpdateStatus::UpToDate)
        } else {
            Ok(UpdateStatus::UpdateAvailable {
                local: short(&local),
                remote: short(&remote),
            })
        }
    }

    async fn fast_forward(&self) -> Result<(), UpdateError> {
        self.git(&["pull", "--ff-only"])
            .await
            .map_err(|e| UpdateError::Apply(e.to_string()))?;
        Ok(())
    }

    async fn hard_reset(&self) -> Result<(), UpdateError> {
        let branch = self.remote_branch().await?;
        self.git(&["reset", "--hard", branch])
            .await
            .map_err(|e| UpdateError::Apply(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command;

    fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args([
                "-c",
                "user.name=coresync",
                "-c",
                "user.email=coresync@localhost",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {:?} failed: {:?}", args, status);
    }

    #[tokio::test]
    async fn repository_without_remote_is_not_configured() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);

        let err = GitUpdateSource::new(dir.path()).check().await.unwrap_err();
        assert!(matches!(err, UpdateError::NotConfigured(_)));
        assert!(err.is_operational());
    }

    #[tokio::test]
    async fn detects_and_applies_upstream_commit() {
        if !git_available() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let upstream = root.path().join("upstream");
        std::fs::create_dir_all(&upstream).unwrap();
        git(&upstream, &["init", "-q"]);
        git(&upstream, &["commit", "-q", "--allow-empty", "-m", "first"]);
        git(root.path(), &["clone", "-q", "upstream", "deployed"]);
        let deployed = root.path().join("deployed");

        let source = GitUpdateSource::new(&deployed);
        assert_eq!(source.check().await.unwrap(), UpdateStatus::UpToDate);

        git(&upstream, &["commit", "-q", "--allow-empty", "-m", "second"]);
        match source.check().await.unwrap() {
            UpdateStatus::UpdateAvailable { local, remote } => {
                assert_eq!(local.len(), 7);
                assert_ne!(local, remote);
            }
            other => panic!("expected an update, got {other:?}"),
        }

        source.fast_forward().await.unwrap();
        assert_eq!(source.check().await.unwrap(), UpdateStatus::UpToDate);
    }

    #[tokio::test]
    async fn local_commits_ahead_of_remote_are_up_to_date() {
        if !git_available() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let upstream = root.path().join("upstream");
        std::fs::create_dir_all(&upstream).unwrap();
        git(&upstream, &["init", "-q"]);
        git(&upstream, &["commit", "-q", "--allow-empty", "-m", "first"]);
        git(root.path(), &["clone", "-q", "upstream", "deployed"]);
        let deployed = root.path().join("deployed");
        git(&deployed, &["commit", "-q", "--allow-empty", "-m", "local hotfix"]);

        let source = GitUpdateSource::new(&deployed);
        assert_eq!(source.check().await.unwrap(), UpdateStatus::UpToDate);
    }
}
