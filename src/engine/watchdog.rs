// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Self-update watchdog.
//!
//! ```text
//! Polling ──► UpdateDetected ──► Restarting
//!    ▲               │
//!    └── both update methods failed
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::WatchdogConfig;
use crate::observability::messages::watchdog::{
    AlreadyUpToDate, CheckFailed, FastForwardFailed, RestartScheduled, UpdateApplied,
    UpdateDetected, UpdateFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{UpdateSource, UpdateStatus};

/// Outcome of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogStep {
    /// Poll again after this long
    Wait(Duration),
    /// An update was applied; the process must be replaced
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogExit {
    RestartRequested,
    Cancelled,
}

pub struct UpdateWatchdog {
    source: Arc<dyn UpdateSource>,
    poll_interval: Duration,
    error_backoff: Duration,
    restart_grace: Duration,
}

impl UpdateWatchdog {
    pub fn new(source: Arc<dyn UpdateSource>, config: &WatchdogConfig) -> Self {
        Self {
            source,
            poll_interval: config.poll_interval(),
            error_backoff: config.error_backoff(),
            restart_grace: config.restart_grace(),
        }
    }

    /// Check once and act on the result.
    pub async fn step(&self) -> WatchdogStep {
        match self.source.check().await {
            Ok(UpdateStatus::UpToDate) => {
                AlreadyUpToDate.log();
                WatchdogStep::Wait(self.poll_interval)
            }
            Ok(UpdateStatus::UpdateAvailable { local, remote }) => {
                UpdateDetected {
                    local: &local,
                    remote: &remote,
                }
                .log();
                if self.apply().await {
                    RestartScheduled {
                        grace: self.restart_grace,
                    }
                    .log();
                    WatchdogStep::Restart
                } else {
                    WatchdogStep::Wait(self.poll_interval)
                }
            }
            Err(e) => {
                let retry_in = if e.is_operational() {
                    self.poll_interval
                } else {
                    self.error_backoff
                };
                CheckFailed {
                    error: &e,
                    retry_in,
                }
                .log();
                WatchdogStep::Wait(retry_in)
            }
        }
    }

    /// Poll until an update is applied or `token` is cancelled.
    pub async fn run(&self, token: CancellationToken) -> WatchdogExit {
        loop {
            let step = tokio::select! {
                _ = token.cancelled() => return WatchdogExit::Cancelled,
                step = self.step() => step,
            };
            match step {
                WatchdogStep::Restart => return WatchdogExit::RestartRequested,
                WatchdogStep::Wait(wait) => {
                    tokio::select! {
                        _ = token.cancelled() => return WatchdogExit::Cancelled,
                        _ = tokio::time::sleep(wait) => {}
                    }
                }
            }
        }
    }

    /// Fast-forward first, hard reset as the fallback.
    async fn apply(&self) -> bool {
        let ff_error = match self.source.fast_forward().await {
            Ok(()) => {
                UpdateApplied {
                    method: "fast-forward",
                }
                .log();
                return true;
            }
            Err(e) => e,
        };
        FastForwardFailed { error: &ff_error }.log();

        match self.source.hard_reset().await {
            Ok(()) => {
                UpdateApplied {
                    method: "hard reset",
                }
                .log();
                true
            }
            Err(e) => {
                UpdateFailed { error: &e }.log();
                false
            }
        }
    }
}
