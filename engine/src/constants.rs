//! Application-wide constants and default values
//!
//! Centralizes magic numbers and default configurations for better maintainability

/// Configuration format version this build accepts (must match exactly)
pub const SERVICE_VERSION: &str = "v0.1";

/// Process lifecycle defaults
pub mod process {
    use std::time::Duration;

    /// Grace period after spawn when `start_seconds` is 0
    pub const DEFAULT_START_SECONDS: u64 = 3;

    /// Total budget for a graceful stop
    pub const STOP_TIMEOUT: Duration = Duration::from_secs(30);

    /// Number of exit checks performed within `STOP_TIMEOUT`
    pub const STOP_POLL_ATTEMPTS: u32 = 100;

    /// Exit code recorded when a process died from a signal
    pub const SIGNALED_EXIT_CODE: i32 = -1;
}

/// Monitor loop defaults
pub mod monitor {
    use std::time::Duration;

    /// Delay between two monitor sweeps
    pub const INTERVAL: Duration = Duration::from_secs(1);
}

/// Status descriptions shown to operators
pub mod description {
    pub const STARTING: &str = "starting";
    pub const RUNNING: &str = "ok";
    pub const STOPPING: &str = "stopping";
    pub const STOPPED: &str = "stopped";
    pub const KILLED: &str = "killed";
}
