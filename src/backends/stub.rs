// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! In-memory transforms, demand and update sources for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::{DemandError, TransformError, UpdateError};
use crate::traits::{
    DemandSource, MirrorTransform, ProtectionTransform, UpdateSource, UpdateStatus,
};

/// Appends `+protected` to every file it is given, or fails when told to.
#[derive(Default)]
pub struct RecordingProtector {
    calls: Mutex<Vec<PathBuf>>,
    failing: AtomicBool,
}

impl RecordingProtector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProtectionTransform for RecordingProtector {
    async fn protect(&self, path: &Path) -> Result<(), TransformError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransformError::ExitStatus {
                program: "stub-protector".into(),
                code: Some(1),
                stderr: "refused".into(),
            });
        }
        let mut contents = tokio::fs::read(path).await?;
        contents.extend_from_slice(b"+protected");
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Records every mirror request without touching the filesystem.
#[derive(Default)]
pub struct RecordingMirror {
    calls: Mutex<Vec<(PathBuf, String)>>,
    failing: AtomicBool,
}

impl RecordingMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(PathBuf, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MirrorTransform for RecordingMirror {
    async fn mirror(&self, local_dir: &Path, remote: &str) -> Result<(), TransformError> {
        self.calls
            .lock()
            .unwrap()
            .push((local_dir.to_path_buf(), remote.to_string()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransformError::ExitStatus {
                program: "stub-mirror".into(),
                code: Some(2),
                stderr: "connection refused".into(),
            });
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Demand source returning a settable answer; `None` simulates an outage.
pub struct FixedDemand {
    value: Mutex<Option<u64>>,
    calls: AtomicUsize,
}

impl FixedDemand {
    pub fn new(value: u64) -> Self {
        Self {
            value: Mutex::new(Some(value)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            value: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, value: Option<u64>) {
        *self.value.lock().unwrap() = value;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DemandSource for FixedDemand {
    async fn fetch(&self, url: &str) -> Result<u64, DemandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let value = *self.value.lock().unwrap();
        value.ok_or_else(|| DemandError::Status {
            url: url.to_string(),
            status: 503,
        })
    }
}

/// Demand source answering from a queue, then failing once it runs dry.
pub struct SequenceDemand {
    answers: Mutex<VecDeque<Option<u64>>>,
}

impl SequenceDemand {
    pub fn new(answers: impl IntoIterator<Item = Option<u64>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
        }
    }
}

#[async_trait]
impl DemandSource for SequenceDemand {
    async fn fetch(&self, url: &str) -> Result<u64, DemandError> {
        let next = self.answers.lock().unwrap().pop_front().flatten();
        next.ok_or_else(|| DemandError::Status {
            url: url.to_string(),
            status: 503,
        })
    }
}

/// Update source answering from scripted results.
pub struct ScriptedUpdateSource {
    checks: Mutex<VecDeque<Result<UpdateStatus, UpdateError>>>,
    fast_forward: Result<(), UpdateError>,
    hard_reset: Result<(), UpdateError>,
    fast_forwards: AtomicUsize,
    hard_resets: AtomicUsize,
}

impl ScriptedUpdateSource {
    pub fn new(checks: impl IntoIterator<Item = Result<UpdateStatus, UpdateError>>) -> Self {
        Self {
            checks: Mutex::new(checks.into_iter().collect()),
            fast_forward: Ok(()),
            hard_reset: Ok(()),
            fast_forwards: AtomicUsize::new(0),
            hard_resets: AtomicUsize::new(0),
        }
    }

    pub fn with_fast_forward(mut self, result: Result<(), UpdateError>) -> Self {
        self.fast_forward = result;
        self
    }

    pub fn with_hard_reset(mut self, result: Result<(), UpdateError>) -> Self {
        self.hard_reset = result;
        self
    }

    pub fn fast_forwards(&self) -> usize {
        self.fast_forwards.load(Ordering::SeqCst)
    }

    pub fn hard_resets(&self) -> usize {
        self.hard_resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpdateSource for ScriptedUpdateSource {
    async fn check(&self) -> Result<UpdateStatus, UpdateError> {
        self.checks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(UpdateStatus::UpToDate))
    }

    async fn fast_forward(&self) -> Result<(), UpdateError> {
        self.fast_forwards.fetch_add(1, Ordering::SeqCst);
        self.fast_forward.clone()
    }

    async fn hard_reset(&self) -> Result<(), UpdateError> {
        self.hard_resets.fetch_add(1, Ordering::SeqCst);
        self.hard_reset.clone()
    }
}
