//! ProcessState value object
//! Represents the lifecycle state of a supervised process

use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of a process in its lifecycle.
///
/// The upper-case string form (`Display`, serde) is a stable contract with
/// display tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProcessState {
    /// No process (initial state, or after a stop/kill)
    #[default]
    Stopped,

    /// Spawned, still inside the start grace period
    Starting,

    /// Survived the start grace period
    Running,

    /// Exited (or failed to spawn) during the grace period; eligible for retry
    Backoff,

    /// Termination signal sent, waiting for the exit
    Stopping,

    /// Exited after having reached RUNNING
    Exited,

    /// Start retries exhausted; only a manual start revives it
    Fatal,
}

impl ProcessState {
    /// States in which the instance owns a live process handle
    pub fn has_live_process(&self) -> bool {
        matches!(
            self,
            ProcessState::Starting | ProcessState::Running | ProcessState::Stopping
        )
    }

    /// States the monitor sweep considers for an automatic restart
    pub fn is_restart_candidate(&self) -> bool {
        matches!(self, ProcessState::Backoff | ProcessState::Exited)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessState::Stopped => "STOPPED",
            ProcessState::Starting => "STARTING",
            ProcessState::Running => "RUNNING",
            ProcessState::Backoff => "BACKOFF",
            ProcessState::Stopping => "STOPPING",
            ProcessState::Exited => "EXITED",
            ProcessState::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
