//! ProcessExecutor port
//! Interface for spawning, signalling and awaiting system processes

use crate::constants::process::SIGNALED_EXIT_CODE;
use crate::domain::{DomainError, ProcessSpec};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Configuration for spawning a process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnConfig {
    /// Program followed by its arguments; never empty
    pub argv: Vec<String>,
    pub working_dir: Option<String>,
    /// When non-empty, replaces the inherited environment entirely
    pub env_vars: Vec<(String, String)>,
}

impl SpawnConfig {
    pub fn from_spec(spec: &ProcessSpec) -> Self {
        let working_dir = if spec.directory().is_empty() {
            None
        } else {
            Some(spec.directory().to_string())
        };

        Self {
            argv: spec.argv().to_vec(),
            working_dir,
            env_vars: spec.env_pairs(),
        }
    }
}

/// How a process ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit status, or `SIGNALED_EXIT_CODE` when a signal ended the process
    pub code: i32,
    pub description: String,
}

impl ExitInfo {
    pub fn exited(code: i32) -> Self {
        Self {
            code,
            description: format!("exit status {}", code),
        }
    }

    pub fn signaled(signal: i32) -> Self {
        Self {
            code: SIGNALED_EXIT_CODE,
            description: format!("signal: {}", signal),
        }
    }
}

/// Signals the supervisor sends to its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Graceful stop request (SIGINT)
    Interrupt,
    /// Forceful termination (SIGKILL)
    Kill,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => write!(f, "SIGINT"),
            Signal::Kill => write!(f, "SIGKILL"),
        }
    }
}

/// Handle resolving once the process has exited
/// This allows event-driven monitoring without polling
pub type ProcessExitHandle = Pin<Box<dyn Future<Output = Result<ExitInfo, DomainError>> + Send>>;

/// Result of spawning a process
pub struct SpawnResult {
    pub pid: u32,
    pub exit_handle: ProcessExitHandle,
}

impl fmt::Debug for SpawnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnResult")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

/// Port for executing system processes
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// Spawn a new process with stdout/stderr inherited from the supervisor
    async fn spawn(&self, config: SpawnConfig) -> Result<SpawnResult, DomainError>;

    /// Deliver a signal to a running process
    async fn signal(&self, pid: u32, signal: Signal) -> Result<(), DomainError>;
}
