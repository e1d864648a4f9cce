//! Scripted executor for unit tests
//! Children are simulated; nothing is spawned on the host

use crate::domain::ports::{
    ExitInfo, ProcessExecutor, ProcessExitHandle, Signal, SpawnConfig, SpawnResult,
};
use crate::domain::DomainError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

const SIGINT: i32 = 2;
const SIGKILL: i32 = 9;

/// How a simulated child behaves, keyed by its program name (`argv[0]`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    /// Exit with `code` after `after`
    ExitAfter(Duration, i32),
    /// Run until interrupted or killed (default)
    RunUntilSignaled,
    /// Run until killed; SIGINT is swallowed
    IgnoreInterrupt,
    /// The spawn itself fails
    FailSpawn(String),
}

struct Child {
    behavior: MockBehavior,
    exit_tx: Option<oneshot::Sender<ExitInfo>>,
}

#[derive(Default)]
struct MockState {
    next_pid: u32,
    behaviors: HashMap<String, MockBehavior>,
    children: HashMap<u32, Child>,
    spawned: Vec<SpawnConfig>,
    signals: Vec<(u32, Signal)>,
}

#[derive(Clone)]
pub struct MockExecutor {
    state: Arc<Mutex<MockState>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                next_pid: 1000,
                ..Default::default()
            })),
        }
    }

    /// Script the behavior of every child started from `program`
    pub fn set_behavior(&self, program: &str, behavior: MockBehavior) {
        self.state
            .lock()
            .unwrap()
            .behaviors
            .insert(program.to_string(), behavior);
    }

    /// Make a running child exit with `code`
    pub fn exit(&self, pid: u32, code: i32) {
        Self::finish(&self.state, pid, ExitInfo::exited(code));
    }

    pub fn spawn_count(&self) -> usize {
        self.state.lock().unwrap().spawned.len()
    }

    pub fn spawned(&self) -> Vec<SpawnConfig> {
        self.state.lock().unwrap().spawned.clone()
    }

    pub fn signals(&self) -> Vec<(u32, Signal)> {
        self.state.lock().unwrap().signals.clone()
    }

    pub fn is_alive(&self, pid: u32) -> bool {
        self.state
            .lock()
            .unwrap()
            .children
            .get(&pid)
            .map(|c| c.exit_tx.is_some())
            .unwrap_or(false)
    }

    fn finish(state: &Arc<Mutex<MockState>>, pid: u32, info: ExitInfo) {
        let tx = state
            .lock()
            .unwrap()
            .children
            .get_mut(&pid)
            .and_then(|c| c.exit_tx.take());
        if let Some(tx) = tx {
            let _ = tx.send(info);
        }
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessExecutor for MockExecutor {
    async fn spawn(&self, config: SpawnConfig) -> Result<SpawnResult, DomainError> {
        let (pid, behavior, rx) = {
            let mut state = self.state.lock().unwrap();
            state.spawned.push(config.clone());

            let program = config.argv.first().cloned().unwrap_or_default();
            let behavior = state
                .behaviors
                .get(&program)
                .cloned()
                .unwrap_or(MockBehavior::RunUntilSignaled);
            if let MockBehavior::FailSpawn(reason) = &behavior {
                return Err(DomainError::SpawnFailed(reason.clone()));
            }

            state.next_pid += 1;
            let pid = state.next_pid;
            let (tx, rx) = oneshot::channel();
            state.children.insert(
                pid,
                Child {
                    behavior: behavior.clone(),
                    exit_tx: Some(tx),
                },
            );
            (pid, behavior, rx)
        };

        if let MockBehavior::ExitAfter(after, code) = behavior {
            let state = self.state.clone();
            tokio::spawn(async move {
                tokio::time::sleep(after).await;
                Self::finish(&state, pid, ExitInfo::exited(code));
            });
        }

        let exit_handle: ProcessExitHandle = Box::pin(async move {
            rx.await
                .map_err(|_| DomainError::SpawnFailed("mock child vanished".to_string()))
        });
        Ok(SpawnResult { pid, exit_handle })
    }

    async fn signal(&self, pid: u32, signal: Signal) -> Result<(), DomainError> {
        let behavior = {
            let mut state = self.state.lock().unwrap();
            state.signals.push((pid, signal));
            match state.children.get(&pid) {
                Some(child) if child.exit_tx.is_some() => child.behavior.clone(),
                _ => {
                    return Err(DomainError::SignalFailed(format!(
                        "no such process: {}",
                        pid
                    )))
                }
            }
        };

        match (signal, behavior) {
            (Signal::Kill, _) => Self::finish(&self.state, pid, ExitInfo::signaled(SIGKILL)),
            (Signal::Interrupt, MockBehavior::IgnoreInterrupt) => {}
            (Signal::Interrupt, _) => Self::finish(&self.state, pid, ExitInfo::signaled(SIGINT)),
        }
        Ok(())
    }
}
