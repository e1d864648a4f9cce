//! Daemon configuration from environment variables
//!
//! Settings are read from environment variables with defaults; the only
//! command-line input is the optional configuration path, which wins over
//! `PROCVISOR_CONFIG_FILE`.

use std::env;

const DEFAULT_LOG_LEVEL: &str = "info";

/// Daemon configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// Supervisor configuration file (YAML)
    pub config_file: Option<String>,

    /// Control address overriding the file's `rpc_addr`
    pub rpc_addr: Option<String>,

    /// Log filter directive
    pub log_level: String,
}

impl DaemonConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            config_file: Self::non_empty("PROCVISOR_CONFIG_FILE"),
            rpc_addr: Self::non_empty("PROCVISOR_RPC_ADDR"),
            log_level: Self::parse_log_level(),
        }
    }

    /// Prefer a path given on the command line
    pub fn with_config_path(mut self, path: Option<String>) -> Self {
        if path.is_some() {
            self.config_file = path;
        }
        self
    }

    fn non_empty(var_name: &str) -> Option<String> {
        env::var(var_name).ok().filter(|s| !s.trim().is_empty())
    }

    fn parse_log_level() -> String {
        // Priority: PROCVISOR_LOG_LEVEL > RUST_LOG > default
        env::var("PROCVISOR_LOG_LEVEL")
            .or_else(|_| env::var("RUST_LOG"))
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.config_file.is_none() {
            return Err(
                "No configuration file: pass CONFIG_PATH or set PROCVISOR_CONFIG_FILE".to_string(),
            );
        }
        Ok(())
    }
}
