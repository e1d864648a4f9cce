//! Process Registry
//! Central composition root owning every supervised process instance

use crate::application::ProcessInstance;
use crate::constants::{monitor, SERVICE_VERSION};
use crate::domain::ports::ProcessExecutor;
use crate::domain::{CommandAction, DomainError, ProcessSnapshot, Result, StartTrigger};
use crate::infrastructure::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// The set of instances built from one configuration.
///
/// The name -> instance map is fixed once `load` returns; each instance
/// guards its own mutable state.
pub struct ProcessRegistry {
    version: String,
    rpc_addr: String,
    order: Vec<String>,
    processes: RwLock<HashMap<String, Arc<ProcessInstance>>>,
}

impl ProcessRegistry {
    /// Validate `config` and build one instance per declared process.
    ///
    /// Fails on a version mismatch, a repeated name or an unusable command;
    /// no registry exists afterwards.
    pub fn load(config: &Config, executor: Arc<dyn ProcessExecutor>) -> Result<Self> {
        if config.version != SERVICE_VERSION {
            return Err(DomainError::UnsupportedVersion {
                found: config.version.clone(),
                expected: SERVICE_VERSION.to_string(),
            });
        }

        let mut order = Vec::with_capacity(config.processes.len());
        let mut processes = HashMap::with_capacity(config.processes.len());

        for process_config in &config.processes {
            let spec = process_config.to_spec()?;
            let name = spec.process_name().to_string();
            if processes.contains_key(&name) {
                return Err(DomainError::DuplicateProcess(name));
            }

            debug!(process = %name, argv = ?spec.argv(), "Loaded process");
            processes.insert(
                name.clone(),
                Arc::new(ProcessInstance::new(spec, executor.clone())),
            );
            order.push(name);
        }

        info!(count = order.len(), "Configuration loaded");
        Ok(Self {
            version: config.version.clone(),
            rpc_addr: config.rpc_addr.clone(),
            order,
            processes: RwLock::new(processes),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn rpc_addr(&self) -> &str {
        &self.rpc_addr
    }

    /// Process names in declaration order
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub async fn get(&self, name: &str) -> Result<Arc<ProcessInstance>> {
        self.processes
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::ProcessNotFound(name.to_string()))
    }

    async fn instances(&self) -> Vec<Arc<ProcessInstance>> {
        self.processes.read().await.values().cloned().collect()
    }

    /// AUTO-start every instance concurrently; failures stay per process
    pub async fn start_all(&self) {
        let mut tasks = JoinSet::new();
        for instance in self.instances().await {
            tasks.spawn(async move {
                if let Err(e) = instance.start(StartTrigger::Auto).await {
                    error!(process = %instance.name(), error = %e, "Autostart failed");
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Autostart task panicked");
            }
        }
    }

    /// One monitor sweep: restart the BACKOFF/EXITED instances the policy allows
    pub async fn monitor_once(&self) {
        let candidates: Vec<Arc<ProcessInstance>> = {
            let processes = self.processes.read().await;
            let mut candidates = Vec::new();
            for instance in processes.values() {
                if instance.state().await.is_restart_candidate() {
                    candidates.push(instance.clone());
                }
            }
            candidates
        };

        for instance in candidates {
            if let Err(e) = instance.start(StartTrigger::Monitor).await {
                warn!(process = %instance.name(), error = %e, "Monitor restart failed");
            }
        }
    }

    /// Sweep immediately, then every `monitor::INTERVAL` until `token` is
    /// cancelled. A sweep in progress is never interrupted.
    pub async fn run_monitor(&self, token: CancellationToken) {
        info!("Process monitor started");
        loop {
            self.monitor_once().await;
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(monitor::INTERVAL) => {}
            }
        }
        info!("Process monitor stopped");
    }

    /// Snapshots of every process in declaration order
    pub async fn read_status_all(&self) -> Vec<ProcessSnapshot> {
        let processes = self.processes.read().await;
        let mut snapshots = Vec::with_capacity(self.order.len());
        for name in &self.order {
            if let Some(instance) = processes.get(name) {
                snapshots.push(instance.read_status().await);
            }
        }
        snapshots
    }

    /// Apply an operator action to one process
    pub async fn dispatch(&self, name: &str, action: CommandAction) -> Result<()> {
        let instance = self.get(name).await?;
        info!(process = %name, action = %action, "Dispatching command");

        match action {
            CommandAction::Start => instance.start(StartTrigger::Manual).await,
            CommandAction::Stop => instance.stop().await,
            CommandAction::Kill => instance.kill().await,
            CommandAction::Restart => {
                instance.stop().await?;
                instance.start(StartTrigger::Manual).await
            }
        }
    }

    /// Stop every live process concurrently, killing the ones that do not
    /// stop in time. Used on daemon shutdown.
    pub async fn shutdown_all(&self) {
        let mut tasks = JoinSet::new();
        for instance in self.instances().await {
            if !instance.state().await.has_live_process() {
                continue;
            }
            tasks.spawn(async move {
                match instance.stop().await {
                    Ok(()) => {}
                    Err(DomainError::StopTimeout { .. }) => {
                        warn!(process = %instance.name(), "Stop timed out, killing");
                        if let Err(e) = instance.kill().await {
                            error!(process = %instance.name(), error = %e, "Kill failed");
                        }
                    }
                    Err(e) => {
                        debug!(process = %instance.name(), error = %e, "Nothing to stop");
                    }
                }
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Shutdown task panicked");
            }
        }
        info!("All processes shut down");
    }
}
