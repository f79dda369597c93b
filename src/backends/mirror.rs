// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backends::process::{render, run_tool};
use crate::config::MirrorConfig;
use crate::errors::TransformError;
use crate::traits::MirrorTransform;

/// Mirrors through an external sync tool driven by a rendered script file.
///
/// The script is written to a temporary file for the duration of one call and
/// removed afterwards, whether the tool succeeded or not.
pub struct ScriptedMirror {
    program: String,
    host: String,
    script: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ScriptedMirror {
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            program: config.program.clone(),
            host: config.host.clone(),
            script: config.script.clone(),
            args: config.args.clone(),
            timeout: config.timeout(),
        }
    }

    fn render_script(&self, local: &str, remote: &str) -> String {
        render(
            &self.script,
            &[("host", self.host.as_str()), ("local", local), ("remote", remote)],
        )
    }
}

#[async_trait]
impl MirrorTransform for ScriptedMirror {
    async fn mirror(&self, local_dir: &Path, remote: &str) -> Result<(), TransformError> {
        let lossy = local_dir.to_string_lossy();
        let local: &str = &lossy;

        let mut file = tempfile::Builder::new()
            .prefix("coresync-sync-")
            .suffix(".txt")
            .tempfile()?;
        file.write_all(self.render_script(local, remote).as_bytes())?;
        file.flush()?;
        // close our handle so the tool can open it; the path is deleted on drop
        let script_path = file.into_temp_path();
        let script_lossy = script_path.to_string_lossy();
        let script: &str = &script_lossy;

        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                render(
                    arg,
                    &[("script", script), ("local", local), ("remote", remote)],
                )
            })
            .collect();

        tracing::debug!(program = %self.program, ?args, "Running mirror tool");
        run_tool(&self.program, &args, None, self.timeout).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Mirrors into a directory on a locally mounted filesystem.
///
/// Only regular files directly inside the local directory take part. A missing
/// local directory mirrors as empty.
pub struct LocalMirror;

impl LocalMirror {
    pub fn new() -> Self {
        LocalMirror
    }
}

impl Default for LocalMirror {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MirrorTransform for LocalMirror {
    async fn mirror(&self, local_dir: &Path, remote: &str) -> Result<(), TransformError> {
        let local = local_dir.to_path_buf();
        let remote = PathBuf::from(remote);
        tokio::task::spawn_blocking(move || sync_dirs(&local, &remote))
            .await
            .map_err(|e| TransformError::Io(io::Error::new(io::ErrorKind::Other, e)))??;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

fn regular_files(dir: &Path) -> io::Result<Vec<(OsString, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.metadata()?.is_file() {
            files.push((entry.file_name(), entry.path()));
        }
    }
    Ok(files)
}

/// True when `remote` is a regular file with exactly the bytes of `local`.
fn same_contents(local: &Path, remote: &Path) -> io::Result<bool> {
    match fs::metadata(remote) {
        Ok(meta) if meta.is_file() => {
            if meta.len() != fs::metadata(local)?.len() {
                return Ok(false);
            }
            Ok(fs::read(local)? == fs::read(remote)?)
        }
        Ok(_) => Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

fn sync_dirs(local: &Path, remote: &Path) -> Result<(), TransformError> {
    fs::create_dir_all(remote)?;

    let wanted = regular_files(local)?;
    let existing = regular_files(remote)?;

    for (name, path) in &wanted {
        let target = remote.join(name);
        if same_contents(path, &target)? {
            continue;
        }
        // a directory squatting on the file name blocks the copy
        if target.is_dir() {
            fs::remove_dir_all(&target)?;
        }
        fs::copy(path, &target)?;
    }

    let keep: HashSet<&OsString> = wanted.iter().map(|(name, _)| name).collect();
    for (name, path) in &existing {
        if !keep.contains(name) {
            fs::remove_file(path)?;
        }
    }

    Ok(())
}
