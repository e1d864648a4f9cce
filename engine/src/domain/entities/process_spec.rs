//! ProcessSpec entity
//! Immutable description of one supervised process, validated at load time

use crate::constants::process::DEFAULT_START_SECONDS;
use crate::domain::services::parse_command;
use crate::domain::{DomainError, RestartPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One supervised process as declared in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    process_name: String,
    command: String,
    argv: Vec<String>,
    directory: String,
    environment: Vec<String>, // KEY=VALUE, declaration order
    autostart: bool,
    autorestart: RestartPolicy,
    start_retries: u32, // 0 = unlimited
    start_seconds: u64, // 0 = DEFAULT_START_SECONDS
    exit_codes: Vec<i32>,
    description: String,
}

impl ProcessSpec {
    pub fn builder(name: impl Into<String>, command: impl Into<String>) -> ProcessSpecBuilder {
        ProcessSpecBuilder::new(name, command)
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    /// The command line as written in the configuration
    pub fn command(&self) -> &str {
        &self.command
    }

    /// The command line split into program and arguments
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Working directory; empty means inherit the supervisor's
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn environment(&self) -> &[String] {
        &self.environment
    }

    pub fn autostart(&self) -> bool {
        self.autostart
    }

    pub fn autorestart(&self) -> RestartPolicy {
        self.autorestart
    }

    pub fn start_retries(&self) -> u32 {
        self.start_retries
    }

    pub fn start_seconds(&self) -> u64 {
        self.start_seconds
    }

    pub fn exit_codes(&self) -> &[i32] {
        &self.exit_codes
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Grace period after spawn during which an exit counts as a failed start
    pub fn start_duration(&self) -> Duration {
        if self.start_seconds == 0 {
            Duration::from_secs(DEFAULT_START_SECONDS)
        } else {
            Duration::from_secs(self.start_seconds)
        }
    }

    /// Whether `backoff_count` has reached the retry ceiling
    pub fn retries_exhausted(&self, backoff_count: u32) -> bool {
        self.start_retries > 0 && backoff_count >= self.start_retries
    }

    /// Environment as key/value pairs; entries without `=` map to an empty value
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        self.environment
            .iter()
            .map(|entry| match entry.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (entry.clone(), String::new()),
            })
            .collect()
    }
}

/// Builder for [`ProcessSpec`]; `build` tokenizes the command
#[derive(Debug, Clone)]
pub struct ProcessSpecBuilder {
    process_name: String,
    command: String,
    directory: String,
    environment: Vec<String>,
    autostart: bool,
    autorestart: RestartPolicy,
    start_retries: u32,
    start_seconds: u64,
    exit_codes: Vec<i32>,
    description: String,
}

impl ProcessSpecBuilder {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            process_name: name.into(),
            command: command.into(),
            directory: String::new(),
            environment: Vec::new(),
            autostart: true,
            autorestart: RestartPolicy::default(),
            start_retries: 0,
            start_seconds: 0,
            exit_codes: Vec::new(),
            description: String::new(),
        }
    }

    pub fn directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn environment(mut self, environment: Vec<String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    pub fn autorestart(mut self, policy: RestartPolicy) -> Self {
        self.autorestart = policy;
        self
    }

    pub fn start_retries(mut self, retries: u32) -> Self {
        self.start_retries = retries;
        self
    }

    pub fn start_seconds(mut self, seconds: u64) -> Self {
        self.start_seconds = seconds;
        self
    }

    pub fn exit_codes(mut self, codes: Vec<i32>) -> Self {
        self.exit_codes = codes;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn build(self) -> Result<ProcessSpec, DomainError> {
        if self.process_name.trim().is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "process_name cannot be empty".to_string(),
            ));
        }

        let argv = match parse_command(&self.command) {
            Ok(argv) => argv,
            Err(DomainError::InvalidCommand(reason)) => {
                return Err(DomainError::InvalidCommand(format!(
                    "process '{}': {}",
                    self.process_name, reason
                )))
            }
            Err(e) => return Err(e),
        };
        if argv.is_empty() {
            return Err(DomainError::InvalidCommand(format!(
                "process '{}': command is empty",
                self.process_name
            )));
        }

        Ok(ProcessSpec {
            process_name: self.process_name,
            command: self.command,
            argv,
            directory: self.directory,
            environment: self.environment,
            autostart: self.autostart,
            autorestart: self.autorestart,
            start_retries: self.start_retries,
            start_seconds: self.start_seconds,
            exit_codes: self.exit_codes,
            description: self.description,
        })
    }
}
