//! Domain-level errors
//! These represent business rule violations and lifecycle precondition failures

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // Registry errors
    #[error("Process '{0}' not found")]
    ProcessNotFound(String),

    #[error("Process '{0}' is declared more than once")]
    DuplicateProcess(String),

    #[error("Unsupported configuration version '{found}' (expected '{expected}')")]
    UnsupportedVersion { found: String, expected: String },

    // Validation errors
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    // Process lifecycle errors
    #[error("Process '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Process '{0}' does not exist")]
    NotExists(String),

    #[error("Process '{0}' is already stopped")]
    AlreadyStopped(String),

    #[error("Process '{name}' did not stop within {seconds}s")]
    StopTimeout { name: String, seconds: u64 },

    // Executor errors
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(String),

    #[error("Failed to signal process: {0}")]
    SignalFailed(String),

    // Control surface errors
    #[error("Action '{0}' is not implemented")]
    Unimplemented(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_process() {
        assert_eq!(
            DomainError::ProcessNotFound("ghost".into()).to_string(),
            "Process 'ghost' not found"
        );
        assert_eq!(
            DomainError::StopTimeout {
                name: "web".into(),
                seconds: 30
            }
            .to_string(),
            "Process 'web' did not stop within 30s"
        );
    }
}
