//! Driving Adapters Layer
//!
//! Adapters that accept external requests and translate them into control
//! API calls.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use procvisor_engine::adapters::rest::build_router;
//! use procvisor_engine::infrastructure::{parse_config, TokioProcessExecutor};
//! use procvisor_engine::{ControlService, ProcessRegistry};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = parse_config("version: v0.1\nprocesses: []\n")?;
//! let registry = ProcessRegistry::load(&config, Arc::new(TokioProcessExecutor::new()))?;
//! let router = build_router(ControlService::new(Arc::new(registry)));
//! # Ok(())
//! # }
//! ```

pub mod rest;
