// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DemandConfig;
use crate::errors::DemandError;
use crate::traits::DemandSource;

/// How many passes the next burst runs.
///
/// The larger of the local shortfall and the outstanding remote demand; never
/// negative, even when the pool is already over quota.
pub fn needed_this_cycle(file_amount: usize, local_count: usize, remote_requested: u64) -> usize {
    let shortfall = file_amount.saturating_sub(local_count);
    let remote = usize::try_from(remote_requested).unwrap_or(usize::MAX);
    shortfall.max(remote)
}

/// Polls a demand source with bounded retries and jittered exponential backoff.
pub struct DemandPoller {
    source: Arc<dyn DemandSource>,
    attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl DemandPoller {
    pub fn new(source: Arc<dyn DemandSource>, config: &DemandConfig) -> Self {
        Self {
            source,
            attempts: config.retry_attempts.max(1),
            initial_backoff: config.initial_backoff(),
            max_backoff: config.max_backoff(),
        }
    }

    /// Current remote demand, or the last error once every attempt failed.
    pub async fn poll(&self, url: &str) -> Result<u64, DemandError> {
        let mut attempt = 1;
        loop {
            match self.source.fetch(url).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.attempts => return Err(e),
                Err(e) => {
                    let delay = self.backoff_delay(attempt);
                    tracing::debug!(
                        url,
                        attempt,
                        of = self.attempts,
                        retry_in_ms = delay.as_millis() as u64,
                        error = %e,
                        "Demand poll failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Delay before retry number `attempt` (1-based): doubles each time, plus up
    /// to a quarter of jitter, never above the configured maximum.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(20);
        let base = self
            .initial_backoff
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff);
        let jitter = rand_jitter(base.as_millis() as u64 / 4);
        (base + Duration::from_millis(jitter)).min(self.max_backoff)
    }
}

fn rand_jitter(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..max)
}
