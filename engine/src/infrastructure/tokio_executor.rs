//! Tokio Process Executor
//! Real implementation of the ProcessExecutor port
//!
//! Children inherit the supervisor's stdout/stderr. Exit is awaited on a
//! blocking thread and forwarded through a oneshot channel.

use crate::domain::ports::{
    ExitInfo, ProcessExecutor, ProcessExitHandle, Signal, SpawnConfig, SpawnResult,
};
use crate::domain::DomainError;
use async_trait::async_trait;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, error, info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessExecutor;

impl TokioProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    fn build_command(config: &SpawnConfig) -> Result<Command, DomainError> {
        let (program, args) = config
            .argv
            .split_first()
            .ok_or_else(|| DomainError::SpawnFailed("empty argument vector".to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        // A declared environment replaces the inherited one
        if !config.env_vars.is_empty() {
            cmd.env_clear();
            cmd.envs(config.env_vars.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(cmd)
    }

    fn exit_info(status: ExitStatus) -> ExitInfo {
        if let Some(code) = status.code() {
            return ExitInfo::exited(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return ExitInfo::signaled(signal);
            }
        }

        ExitInfo {
            code: crate::constants::process::SIGNALED_EXIT_CODE,
            description: status.to_string(),
        }
    }

    /// Create an exit handle for a spawned child
    fn create_exit_handle(mut child: std::process::Child, pid: u32) -> ProcessExitHandle {
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let exit_result = tokio::task::spawn_blocking(move || match child.wait() {
                Ok(status) => {
                    let info = Self::exit_info(status);
                    debug!(pid = pid, exit_code = info.code, "Process exited");
                    Ok(info)
                }
                Err(e) => {
                    error!(pid = pid, error = %e, "Failed to wait for process");
                    Err(DomainError::SpawnFailed(format!(
                        "Failed to wait for process: {}",
                        e
                    )))
                }
            })
            .await
            .unwrap_or_else(|e| {
                error!(error = %e, "Blocking task panicked");
                Err(DomainError::SpawnFailed(format!("Wait task panicked: {}", e)))
            });
            let _ = tx.send(exit_result);
        });

        Box::pin(async move {
            match rx.await {
                Ok(result) => result,
                Err(_) => Err(DomainError::SpawnFailed(
                    "Process monitor task died unexpectedly".to_string(),
                )),
            }
        })
    }
}

#[async_trait]
impl ProcessExecutor for TokioProcessExecutor {
    async fn spawn(&self, config: SpawnConfig) -> Result<SpawnResult, DomainError> {
        let mut cmd = Self::build_command(&config)?;

        let child = cmd.spawn().map_err(|e| {
            warn!(argv = ?config.argv, error = %e, "Failed to spawn process");
            DomainError::SpawnFailed(format!("{}: {}", config.argv[0], e))
        })?;

        let pid = child.id();
        info!(pid = pid, program = %config.argv[0], "Process spawned");

        Ok(SpawnResult {
            pid,
            exit_handle: Self::create_exit_handle(child, pid),
        })
    }

    async fn signal(&self, pid: u32, signal: Signal) -> Result<(), DomainError> {
        debug!(pid = pid, signal = %signal, "Sending signal");

        #[cfg(unix)]
        {
            let raw = match signal {
                Signal::Interrupt => libc::SIGINT,
                Signal::Kill => libc::SIGKILL,
            };
            let result = unsafe { libc::kill(pid as i32, raw) };
            if result != 0 {
                let err = std::io::Error::last_os_error();
                warn!(
                    pid = pid,
                    signal = %signal,
                    error = %err,
                    "Failed to send signal to process"
                );
                return Err(DomainError::SignalFailed(format!(
                    "{} to pid {}: {}",
                    signal, pid, err
                )));
            }
            Ok(())
        }

        #[cfg(not(unix))]
        {
            Err(DomainError::SignalFailed(format!(
                "{} to pid {}: signals are not supported on this platform",
                signal, pid
            )))
        }
    }
}
