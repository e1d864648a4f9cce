//! procvisor engine
//!
//! Supervises a fixed set of child processes declared in a configuration file:
//! spawns them, classifies quick exits as start failures, restarts them per
//! policy and exposes a small control surface (ping / list / command).
//!
//! Layers:
//! - `domain`: specs, status, value objects, errors and the executor port
//! - `application`: process instances, the registry and the control API
//! - `infrastructure`: YAML configuration and the real process executor
//! - `adapters`: the REST control transport

pub mod adapters;
pub mod application;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::{ControlService, ProcessInstance, ProcessRegistry};
pub use constants::SERVICE_VERSION;
pub use domain::{DomainError, Result};

pub const DEFAULT_RPC_ADDR: &str = "127.0.0.1:7766";
