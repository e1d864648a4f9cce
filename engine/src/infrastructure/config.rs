//! Configuration loading from a YAML file
//!
//! One file declares the format version, the control address and the ordered
//! list of processes:
//!
//! ```yaml
//! version: v0.1
//! rpc_addr: 127.0.0.1:7766
//! processes:
//!   - process_name: sleep_60s
//!     command: sleep 60
//!     directory: /tmp
//!     environment: [HELLO=WORLD]
//! ```

use crate::domain::{DomainError, ProcessSpec, RestartPolicy};
use crate::DEFAULT_RPC_ADDR;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,

    #[serde(default = "default_rpc_addr")]
    pub rpc_addr: String,

    /// Declaration order is preserved and drives status listing order
    #[serde(default, alias = "process")]
    pub processes: Vec<ProcessConfig>,
}

/// Process configuration from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    pub process_name: String,

    pub command: String,

    #[serde(default)]
    pub directory: String,

    #[serde(default)]
    pub environment: Vec<String>,

    /// Defaults to `true` when omitted: a process is started at boot unless
    /// the file says `autostart: false`. Files written for supervisors that
    /// treat a missing flag as `false` must set it explicitly.
    #[serde(default = "default_true")]
    pub autostart: bool,

    #[serde(default)]
    pub autorestart: RestartPolicy,

    #[serde(default)]
    pub start_retries: u32,

    #[serde(default)]
    pub start_seconds: u64,

    #[serde(default)]
    pub exit_codes: Vec<i32>,

    #[serde(default)]
    pub description: String,
}

fn default_true() -> bool {
    true
}

fn default_rpc_addr() -> String {
    DEFAULT_RPC_ADDR.to_string()
}

impl ProcessConfig {
    /// Validate and convert into a domain spec (tokenizes the command)
    pub fn to_spec(&self) -> Result<ProcessSpec, DomainError> {
        ProcessSpec::builder(self.process_name.clone(), self.command.clone())
            .directory(self.directory.clone())
            .environment(self.environment.clone())
            .autostart(self.autostart)
            .autorestart(self.autorestart)
            .start_retries(self.start_retries)
            .start_seconds(self.start_seconds)
            .exit_codes(self.exit_codes.clone())
            .description(self.description.clone())
            .build()
    }
}

/// Parse a configuration document
pub fn parse_config(contents: &str) -> Result<Config, String> {
    serde_yaml::from_str(contents).map_err(|e| format!("Failed to parse YAML: {}", e))
}

/// Load the configuration file at `config_path`
pub fn load_config_from_path(config_path: &str) -> Result<Config, String> {
    let path = Path::new(config_path);
    if !path.is_file() {
        return Err(format!("Configuration file does not exist: {}", config_path));
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file '{}': {}", config_path, e))?;
    parse_config(&contents).map_err(|e| format!("{} ({})", e, config_path))
}
