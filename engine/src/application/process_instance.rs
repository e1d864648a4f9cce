//! Process Instance
//! Runtime state machine for one supervised process
//!
//! Two locks per instance:
//! - the status lock (`inner`) orders every status/handle mutation
//! - the start gate allows one start-and-watch sequence at a time; on a
//!   successful spawn its guard moves into the watcher task, which releases
//!   it once the start is classified (RUNNING, BACKOFF or FATAL)

use crate::constants::description;
use crate::constants::process::{STOP_POLL_ATTEMPTS, STOP_TIMEOUT};
use crate::domain::ports::{ExitInfo, ProcessExecutor, ProcessExitHandle, Signal, SpawnConfig};
use crate::domain::{
    DomainError, ProcessSnapshot, ProcessSpec, ProcessState, ProcessStatus, Result, StartTrigger,
};
use std::sync::{Arc, OnceLock};
use tokio::sync::{oneshot, Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};

/// A spawned child. The exit is recorded here by a dedicated task that never
/// takes the status lock, so a `stop()` holding the lock can still observe it.
#[derive(Debug)]
struct LiveHandle {
    pid: u32,
    exit: OnceLock<ExitInfo>,
}

impl LiveHandle {
    fn new(pid: u32) -> Self {
        Self {
            pid,
            exit: OnceLock::new(),
        }
    }

    fn has_exited(&self) -> bool {
        self.exit.get().is_some()
    }

    fn mark_exited(&self, info: ExitInfo) {
        let _ = self.exit.set(info);
    }
}

#[derive(Debug, Default)]
struct Inner {
    status: ProcessStatus,
    handle: Option<Arc<LiveHandle>>,
}

impl Inner {
    /// Whether `handle` is still the one this instance tracks
    fn is_current(&self, handle: &Arc<LiveHandle>) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, handle))
    }

    /// BACKOFF, or FATAL once the retry ceiling is reached
    fn record_failed_start(&mut self, spec: &ProcessSpec, description: String) {
        self.status.backoff_count += 1;
        self.status.state = if spec.retries_exhausted(self.status.backoff_count) {
            ProcessState::Fatal
        } else {
            ProcessState::Backoff
        };
        self.status.description = description;
    }
}

pub struct ProcessInstance {
    spec: ProcessSpec,
    executor: Arc<dyn ProcessExecutor>,
    inner: RwLock<Inner>,
    start_gate: Arc<Mutex<()>>,
}

impl ProcessInstance {
    pub fn new(spec: ProcessSpec, executor: Arc<dyn ProcessExecutor>) -> Self {
        Self {
            spec,
            executor,
            inner: RwLock::new(Inner::default()),
            start_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn name(&self) -> &str {
        self.spec.process_name()
    }

    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }

    pub async fn state(&self) -> ProcessState {
        self.inner.read().await.status.state
    }

    /// Start the process on behalf of `trigger`.
    ///
    /// Returns `Ok(())` without spawning when the trigger's guard declines
    /// (AUTO with `autostart` off, MONITOR on an ineligible state).
    pub async fn start(self: &Arc<Self>, trigger: StartTrigger) -> Result<()> {
        let gate = self.start_gate.clone().lock_owned().await;
        let mut inner = self.inner.write().await;

        match trigger {
            StartTrigger::Auto => {
                if !self.spec.autostart() {
                    debug!(process = %self.name(), "autostart disabled, skipping");
                    return Ok(());
                }
            }
            StartTrigger::Manual => {
                inner.status.backoff_count = 0;
            }
            StartTrigger::Monitor => {
                let eligible = match inner.status.state {
                    ProcessState::Backoff => true,
                    ProcessState::Exited => self
                        .spec
                        .autorestart()
                        .should_restart(inner.status.last_exit_code, self.spec.exit_codes()),
                    _ => false,
                };
                if !eligible {
                    return Ok(());
                }
            }
        }

        if let Some(handle) = &inner.handle {
            if !handle.has_exited() {
                return Err(DomainError::AlreadyRunning(self.name().to_string()));
            }
        }

        info!(
            process = %self.name(),
            trigger = %trigger,
            command = %self.spec.command(),
            "Starting process"
        );

        let spawned = match self
            .executor
            .spawn(SpawnConfig::from_spec(&self.spec))
            .await
        {
            Ok(spawned) => spawned,
            Err(e) => {
                inner.handle = None;
                inner.record_failed_start(&self.spec, format!("start failed: {}", e));
                warn!(
                    process = %self.name(),
                    backoff_count = inner.status.backoff_count,
                    state = %inner.status.state,
                    error = %e,
                    "Failed to spawn process"
                );
                return Err(e);
            }
        };

        let handle = Arc::new(LiveHandle::new(spawned.pid));
        inner.handle = Some(handle.clone());
        inner.status.state = ProcessState::Starting;
        inner.status.description = description::STARTING.to_string();
        drop(inner);

        debug!(process = %self.name(), pid = spawned.pid, "Process spawned");
        let exited = self.track_exit(handle.clone(), spawned.exit_handle);
        tokio::spawn(Arc::clone(self).watch(handle, exited, gate));
        Ok(())
    }

    /// Record the exit on `handle` as soon as it happens, without touching
    /// the status lock, and forward it to the watcher.
    fn track_exit(
        self: &Arc<Self>,
        handle: Arc<LiveHandle>,
        exit: ProcessExitHandle,
    ) -> oneshot::Receiver<ExitInfo> {
        let (tx, rx) = oneshot::channel();
        let instance = Arc::clone(self);
        tokio::spawn(async move {
            let info = instance.exit_info(handle.pid, exit.await);
            handle.mark_exited(info.clone());
            let _ = tx.send(info);
        });
        rx
    }

    /// Race the exit against the start grace period, then follow the
    /// process until it exits. Owns the start gate until the start is
    /// classified.
    async fn watch(
        self: Arc<Self>,
        handle: Arc<LiveHandle>,
        mut exited: oneshot::Receiver<ExitInfo>,
        gate: OwnedMutexGuard<()>,
    ) {
        let grace = tokio::time::sleep(self.spec.start_duration());

        tokio::select! {
            received = &mut exited => {
                let info = self.received_exit(&handle, received);

                let mut inner = self.inner.write().await;
                if inner.is_current(&handle) && inner.status.state == ProcessState::Starting {
                    inner.status.last_exit_code = info.code;
                    inner.record_failed_start(&self.spec, info.description);
                    warn!(
                        process = %self.name(),
                        pid = handle.pid,
                        exit_code = info.code,
                        backoff_count = inner.status.backoff_count,
                        state = %inner.status.state,
                        "Process exited during start grace period"
                    );
                }
                drop(inner);
                drop(gate);
                return;
            }
            _ = grace => {
                let mut inner = self.inner.write().await;
                if inner.is_current(&handle) && inner.status.state == ProcessState::Starting {
                    inner.status.backoff_count = 0;
                    inner.status.state = ProcessState::Running;
                    inner.status.description = description::RUNNING.to_string();
                    info!(process = %self.name(), pid = handle.pid, "Process running");
                }
            }
        }
        drop(gate);

        let received = exited.await;
        let info = self.received_exit(&handle, received);

        let mut inner = self.inner.write().await;
        if !inner.is_current(&handle) {
            return;
        }
        match inner.status.state {
            ProcessState::Stopping | ProcessState::Stopped => {
                debug!(process = %self.name(), pid = handle.pid, "Expected exit after stop");
            }
            _ => {
                inner.status.last_exit_code = info.code;
                inner.status.state = ProcessState::Exited;
                inner.status.description = info.description;
                info!(
                    process = %self.name(),
                    pid = handle.pid,
                    exit_code = info.code,
                    "Process exited"
                );
            }
        }
    }

    /// Exit forwarded by `track_exit`; a dropped sender means the exit was lost
    fn received_exit(
        &self,
        handle: &LiveHandle,
        received: std::result::Result<ExitInfo, oneshot::error::RecvError>,
    ) -> ExitInfo {
        let info = received.unwrap_or_else(|_| {
            self.exit_info(
                handle.pid,
                Err(DomainError::SpawnFailed(
                    "exit tracking task died unexpectedly".to_string(),
                )),
            )
        });
        handle.mark_exited(info.clone());
        info
    }

    fn exit_info(&self, pid: u32, result: Result<ExitInfo>) -> ExitInfo {
        result.unwrap_or_else(|e| {
            warn!(process = %self.name(), pid = pid, error = %e, "Lost track of process exit");
            ExitInfo {
                code: crate::constants::process::SIGNALED_EXIT_CODE,
                description: e.to_string(),
            }
        })
    }

    /// Gracefully stop the process, waiting up to `STOP_TIMEOUT` for it to
    /// exit. The status lock is held for the whole wait.
    pub async fn stop(&self) -> Result<()> {
        let mut inner = self.inner.write().await;

        let handle = match &inner.handle {
            None => return Err(DomainError::NotExists(self.name().to_string())),
            Some(handle) if handle.has_exited() => {
                return Err(DomainError::AlreadyStopped(self.name().to_string()))
            }
            Some(handle) => handle.clone(),
        };

        info!(process = %self.name(), pid = handle.pid, "Stopping process");
        let signaled = self.executor.signal(handle.pid, Signal::Interrupt).await;
        inner.status.state = ProcessState::Stopping;
        inner.status.description = description::STOPPING.to_string();
        signaled?;

        let interval = STOP_TIMEOUT / STOP_POLL_ATTEMPTS;
        for _ in 0..STOP_POLL_ATTEMPTS {
            tokio::time::sleep(interval).await;
            if handle.has_exited() {
                inner.status.state = ProcessState::Stopped;
                inner.status.description = description::STOPPED.to_string();
                inner.handle = None;
                info!(process = %self.name(), pid = handle.pid, "Process stopped");
                return Ok(());
            }
        }

        warn!(
            process = %self.name(),
            pid = handle.pid,
            timeout_secs = STOP_TIMEOUT.as_secs(),
            "Process did not stop in time"
        );
        Err(DomainError::StopTimeout {
            name: self.name().to_string(),
            seconds: STOP_TIMEOUT.as_secs(),
        })
    }

    /// Forcefully kill the process; STOPPED without waiting for the reap
    pub async fn kill(&self) -> Result<()> {
        let mut inner = self.inner.write().await;

        let handle = match &inner.handle {
            None => return Err(DomainError::NotExists(self.name().to_string())),
            Some(handle) if handle.has_exited() => {
                return Err(DomainError::AlreadyStopped(self.name().to_string()))
            }
            Some(handle) => handle.clone(),
        };

        self.executor.signal(handle.pid, Signal::Kill).await?;
        inner.handle = None;
        inner.status.state = ProcessState::Stopped;
        inner.status.description = description::KILLED.to_string();
        info!(process = %self.name(), pid = handle.pid, "Process killed");
        Ok(())
    }

    pub async fn read_status(&self) -> ProcessSnapshot {
        let inner = self.inner.read().await;
        let mut status = inner.status.clone();
        status.pid = inner
            .handle
            .as_ref()
            .filter(|handle| !handle.has_exited())
            .map(|handle| handle.pid);

        ProcessSnapshot {
            spec: self.spec.clone(),
            status,
        }
    }
}
