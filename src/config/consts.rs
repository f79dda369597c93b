/// Manifest file expected inside every project folder
pub const MANIFEST_FILE: &str = "Setup.json";
/// Source tree copied into the staging workspace on every pass
pub const SOURCE_DIR: &str = "Src";
/// Staging workspace, rebuilt from the source tree on every pass
pub const STAGING_DIR: &str = "gen";
/// Local artifact pool mirrored to the remote destination
pub const OUTPUT_DIR: &str = "Output";

/// Default runtime configuration file
pub const DEFAULT_CONFIG_FILE: &str = "coresync.yaml";
/// Default directory holding one sub-folder per project
pub const DEFAULT_SETUP_DIR: &str = "./Setup";
/// Default artifact file name prefix
pub const DEFAULT_ARTIFACT_PREFIX: &str = "APG_Run";
/// Length of the random token embedded in every artifact name
pub const ARTIFACT_TOKEN_LEN: usize = 8;

/// Default wait at the end of every idle cycle (seconds)
pub const DEFAULT_IDLE_INTERVAL_SECS: u64 = 60;
/// Upper bound on the idle wait while the demand endpoint keeps failing (seconds)
pub const DEFAULT_MAX_IDLE_BACKOFF_SECS: u64 = 960;

/// Default demand request timeout (seconds)
pub const DEFAULT_DEMAND_TIMEOUT_SECS: u64 = 10;
/// Default demand attempts per cycle
pub const DEFAULT_DEMAND_RETRY_ATTEMPTS: u32 = 3;
/// Default first retry delay for the demand endpoint (milliseconds)
pub const DEFAULT_DEMAND_INITIAL_BACKOFF_MS: u64 = 1_000;
/// Default retry delay cap for the demand endpoint (seconds)
pub const DEFAULT_DEMAND_MAX_BACKOFF_SECS: u64 = 30;

/// Default watchdog polling interval (seconds)
pub const DEFAULT_WATCHDOG_POLL_SECS: u64 = 10;
/// Default watchdog backoff after an unexpected failure (seconds)
pub const DEFAULT_WATCHDOG_ERROR_BACKOFF_SECS: u64 = 30;
/// Default grace period before the process is replaced (seconds)
pub const DEFAULT_RESTART_GRACE_SECS: u64 = 2;

/// Default delay before a crashed orchestrator is started again (seconds)
pub const DEFAULT_SUPERVISOR_RESTART_DELAY_SECS: u64 = 5;

/// Default protection tool
pub const DEFAULT_PROTECT_PROGRAM: &str = "./VMProtect_Con.exe";
/// Default mirror tool
pub const DEFAULT_MIRROR_PROGRAM: &str = "winscp.com";
/// Default WinSCP synchronisation script
pub const DEFAULT_MIRROR_SCRIPT: &str =
    "open {host}\nsynchronize remote -delete \"{local}\" {remote}\nexit\n";
