//! ProcessStatus entity
//! Mutable runtime view of one process, and the snapshot served to clients

use crate::domain::entities::ProcessSpec;
use crate::domain::ProcessState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStatus {
    pub state: ProcessState,
    /// Present only while a live handle exists
    pub pid: Option<u32>,
    pub description: String,
    pub last_exit_code: i32,
    pub backoff_count: u32,
}

/// Point-in-time copy of a spec and its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSnapshot {
    pub spec: ProcessSpec,
    pub status: ProcessStatus,
}
