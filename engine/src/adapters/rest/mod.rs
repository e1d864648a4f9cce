//! REST API Driving Adapter
//!
//! Exposes the control API over HTTP (JSON):
//! - `GET /ping`
//! - `GET /processes`
//! - `POST /processes/:name/:action` (`start`, `stop`, `kill`, `restart`)

pub mod handlers;
pub mod router;
pub mod server;

pub use router::build_router;
pub use server::serve_on_tcp;
