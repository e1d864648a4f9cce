//! RestartPolicy value object
//! Defines when an EXITED process is automatically restarted by the monitor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Autorestart policy for processes that exited after reaching RUNNING
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RestartPolicy {
    /// Never restart the process
    #[default]
    #[serde(alias = "FALSE", alias = "never")]
    Never,

    /// Always restart, regardless of exit code
    #[serde(alias = "TRUE", alias = "always")]
    Always,

    /// Restart unless the exit code is listed as expected
    #[serde(alias = "unexpected")]
    Unexpected,
}

impl RestartPolicy {
    /// Check if the process should be restarted given its last exit code
    /// and the set of exit codes considered expected
    pub fn should_restart(&self, exit_code: i32, expected_exit_codes: &[i32]) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::Always => true,
            RestartPolicy::Unexpected => !expected_exit_codes.contains(&exit_code),
        }
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "NEVER" | "FALSE" => Some(RestartPolicy::Never),
            "ALWAYS" | "TRUE" => Some(RestartPolicy::Always),
            "UNEXPECTED" => Some(RestartPolicy::Unexpected),
            _ => None,
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestartPolicy::Never => write!(f, "NEVER"),
            RestartPolicy::Always => write!(f, "ALWAYS"),
            RestartPolicy::Unexpected => write!(f, "UNEXPECTED"),
        }
    }
}
