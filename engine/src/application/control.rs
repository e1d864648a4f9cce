//! Control API
//! Transport-agnostic calls the REST adapter and tests invoke

use crate::application::ProcessRegistry;
use crate::domain::{CommandAction, DomainError, ProcessSnapshot, Result};
use std::sync::Arc;

#[derive(Clone)]
pub struct ControlService {
    registry: Arc<ProcessRegistry>,
}

impl ControlService {
    pub fn new(registry: Arc<ProcessRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ProcessRegistry> {
        &self.registry
    }

    /// Service version of the loaded configuration
    pub fn ping(&self) -> String {
        self.registry.version().to_string()
    }

    /// Every process in configuration order
    pub async fn list(&self) -> Vec<ProcessSnapshot> {
        self.registry.read_status_all().await
    }

    /// Run `action` (START, STOP, KILL or RESTART, any case) on `process_name`
    pub async fn command(&self, process_name: &str, action: &str) -> Result<()> {
        let action = CommandAction::parse(action)
            .ok_or_else(|| DomainError::Unimplemented(action.to_string()))?;
        self.registry.dispatch(process_name, action).await
    }
}
