//! Infrastructure Layer
//! Configuration loading and the concrete process executor

pub mod config;
pub mod tokio_executor;

pub use config::{load_config_from_path, parse_config, Config, ProcessConfig};
pub use tokio_executor::TokioProcessExecutor;
