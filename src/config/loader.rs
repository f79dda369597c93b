// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::*;
use crate::errors::{ConfigError, FailurePolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Process-wide runtime configuration.
///
/// Loaded once at startup and handed to every component that needs it; nothing
/// reads configuration ambiently. Every section is optional and falls back to the
/// values in [`crate::config::consts`].
///
/// # Example
/// ```yaml
/// setup_dir: ./Setup
/// failure_policy: best_effort
/// protect:
///   program: ./VMProtect_Con.exe
///   args: ["{input}", "{output}"]
/// mirror:
///   kind: scripted
///   program: winscp.com
///   host: sftp://deploy@files.example.com
/// schedule:
///   idle_interval_secs: 60
/// watchdog:
///   enabled: true
///   repo_dir: .
/// ```
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RuntimeConfig {
    pub setup_dir: PathBuf,
    pub artifact_prefix: String,
    pub failure_policy: FailurePolicy,
    pub timestamp_source: TimestampSource,
    pub protect: ProtectConfig,
    pub mirror: MirrorConfig,
    pub schedule: ScheduleConfig,
    pub demand: DemandConfig,
    pub watchdog: WatchdogConfig,
    pub supervisor: SupervisorConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            setup_dir: PathBuf::from(DEFAULT_SETUP_DIR),
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            failure_policy: FailurePolicy::default(),
            timestamp_source: TimestampSource::default(),
            protect: ProtectConfig::default(),
            mirror: MirrorConfig::default(),
            schedule: ScheduleConfig::default(),
            demand: DemandConfig::default(),
            watchdog: WatchdogConfig::default(),
            supervisor: SupervisorConfig::default(),
        }
    }
}

/// Which file timestamp orders artifacts for eviction.
///
/// * `Created` - birth time, falling back to modification time where the
///   filesystem does not record one
/// * `Modified` - last modification time
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    #[default]
    Created,
    Modified,
}

/// Protection tool invocation. `{input}` and `{output}` in `args` are replaced
/// by the staged file path.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProtectConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for ProtectConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROTECT_PROGRAM.to_string(),
            args: vec!["{input}".to_string(), "{output}".to_string()],
            timeout_secs: None,
        }
    }
}

impl ProtectConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Mirror backend selection.
///
/// * `Scripted` - render a script file and hand it to an external sync tool
/// * `Local` - treat the remote path as a local directory and mirror into it
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MirrorKind {
    #[default]
    Scripted,
    Local,
}

/// Mirror tool invocation. The script understands `{host}`, `{local}` and
/// `{remote}`; `args` additionally understands `{script}`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MirrorConfig {
    pub kind: MirrorKind,
    pub program: String,
    pub host: String,
    pub script: String,
    pub args: Vec<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            kind: MirrorKind::default(),
            program: DEFAULT_MIRROR_PROGRAM.to_string(),
            host: String::new(),
            script: DEFAULT_MIRROR_SCRIPT.to_string(),
            args: vec!["/script={script}".to_string()],
            timeout_secs: None,
        }
    }
}

impl MirrorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Orchestrator pacing.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    pub idle_interval_secs: u64,
    pub max_idle_backoff_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            idle_interval_secs: DEFAULT_IDLE_INTERVAL_SECS,
            max_idle_backoff_secs: DEFAULT_MAX_IDLE_BACKOFF_SECS,
        }
    }
}

impl ScheduleConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_secs(self.idle_interval_secs)
    }

    pub fn max_idle_backoff(&self) -> Duration {
        Duration::from_secs(self.max_idle_backoff_secs)
    }
}

/// Demand endpoint retry policy.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DemandConfig {
    pub timeout_secs: u64,
    pub retry_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_secs: u64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_DEMAND_TIMEOUT_SECS,
            retry_attempts: DEFAULT_DEMAND_RETRY_ATTEMPTS,
            initial_backoff_ms: DEFAULT_DEMAND_INITIAL_BACKOFF_MS,
            max_backoff_secs: DEFAULT_DEMAND_MAX_BACKOFF_SECS,
        }
    }
}

impl DemandConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_secs(self.max_backoff_secs)
    }
}

/// Self-update watchdog settings.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WatchdogConfig {
    pub enabled: bool,
    pub repo_dir: PathBuf,
    pub poll_interval_secs: u64,
    pub error_backoff_secs: u64,
    pub restart_grace_secs: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_dir: PathBuf::from("."),
            poll_interval_secs: DEFAULT_WATCHDOG_POLL_SECS,
            error_backoff_secs: DEFAULT_WATCHDOG_ERROR_BACKOFF_SECS,
            restart_grace_secs: DEFAULT_RESTART_GRACE_SECS,
        }
    }
}

impl WatchdogConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs(self.error_backoff_secs)
    }

    pub fn restart_grace(&self) -> Duration {
        Duration::from_secs(self.restart_grace_secs)
    }
}

/// Supervision of orchestrator tasks.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SupervisorConfig {
    pub restart_delay_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            restart_delay_secs: DEFAULT_SUPERVISOR_RESTART_DELAY_SECS,
        }
    }
}

impl SupervisorConfig {
    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }
}

/// Load a runtime config from a YAML file.
///
/// A missing file is not an error: the built-in defaults apply.
pub fn load_runtime_config<P: AsRef<Path>>(path: P) -> Result<RuntimeConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(RuntimeConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: RuntimeConfig =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    validate_runtime_config(&cfg)?;
    Ok(cfg)
}

fn validate_runtime_config(cfg: &RuntimeConfig) -> Result<(), ConfigError> {
    if cfg.protect.program.trim().is_empty() {
        return Err(ConfigError::Invalid("protect.program must not be empty".into()));
    }
    if cfg.mirror.kind == MirrorKind::Scripted && cfg.mirror.program.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "mirror.program must not be empty for the scripted mirror".into(),
        ));
    }
    if cfg.artifact_prefix.contains(['/', '\\']) {
        return Err(ConfigError::Invalid(format!(
            "artifact_prefix must not contain path separators: {}",
            cfg.artifact_prefix
        )));
    }
    if cfg.schedule.idle_interval_secs == 0 {
        return Err(ConfigError::Invalid(
            "schedule.idle_interval_secs must be greater than 0".into(),
        ));
    }
    if cfg.demand.retry_attempts == 0 {
        return Err(ConfigError::Invalid(
            "demand.retry_attempts must be at least 1".into(),
        ));
    }
    Ok(())
}
