//! REST API router configuration

use super::handlers::{command_process, list_processes, ping, AppState};
use axum::{
    routing::{get, post},
    Router,
};

/// Build the REST API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/processes", get(list_processes))
        .route("/processes/:name/:action", post(command_process))
        .with_state(state)
}
