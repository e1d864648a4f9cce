//! procvisord - process supervisor daemon
//!
//! Loads the supervisor configuration, starts the declared processes, runs
//! the monitor loop and serves the control API until SIGINT/SIGTERM.

#[path = "daemon/config.rs"]
mod config;

use clap::Parser;
use config::DaemonConfig;
use procvisor_engine::adapters::rest::{build_router, serve_on_tcp};
use procvisor_engine::infrastructure::{load_config_from_path, TokioProcessExecutor};
use procvisor_engine::{ControlService, ProcessRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "procvisord", version, about = "Process supervisor daemon")]
struct Args {
    /// Supervisor configuration file (overrides PROCVISOR_CONFIG_FILE)
    config_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let daemon_config = DaemonConfig::from_env().with_config_path(args.config_path);

    let filter = EnvFilter::try_new(&daemon_config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    daemon_config.validate()?;
    let config_path = daemon_config
        .config_file
        .clone()
        .ok_or("configuration file not set")?;

    info!(
        config = %config_path,
        version = env!("CARGO_PKG_VERSION"),
        "procvisord starting"
    );

    let config = load_config_from_path(&config_path)?;
    let registry = Arc::new(ProcessRegistry::load(
        &config,
        Arc::new(TokioProcessExecutor::new()),
    )?);

    let rpc_addr = daemon_config
        .rpc_addr
        .clone()
        .unwrap_or_else(|| registry.rpc_addr().to_string());
    let addr: SocketAddr = rpc_addr
        .parse()
        .map_err(|e| format!("Invalid rpc_addr '{}': {}", rpc_addr, e))?;

    registry.start_all().await;

    let token = CancellationToken::new();
    let monitor = {
        let registry = registry.clone();
        let token = token.clone();
        tokio::spawn(async move { registry.run_monitor(token).await })
    };

    let app = build_router(ControlService::new(registry.clone()));
    let served = serve_on_tcp(addr, app, shutdown_signal()).await;
    if let Err(e) = &served {
        error!(error = %e, "REST API server failed");
    }

    token.cancel();
    if let Err(e) = monitor.await {
        error!(error = %e, "Monitor task failed");
    }
    registry.shutdown_all().await;

    info!("procvisord stopped");
    served
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
                }
            }
            Err(e) => {
                error!(error = %e, "Cannot install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl-C");
    }
}
