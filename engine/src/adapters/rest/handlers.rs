//! REST API handlers using axum

use crate::application::ControlService;
use crate::domain::{DomainError, ProcessSnapshot};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// Shared application state
pub type AppState = ControlService;

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /ping response
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub service_version: String,
}

/// GET /processes response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListProcessesResponse {
    pub processes: Vec<ProcessSnapshot>,
}

/// Simple success response
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub message: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a control-surface error
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::ProcessNotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Unimplemented(_) => StatusCode::NOT_IMPLEMENTED,
        DomainError::AlreadyRunning(_)
        | DomainError::NotExists(_)
        | DomainError::AlreadyStopped(_) => StatusCode::CONFLICT,
        DomainError::StopTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(error: DomainError) -> ApiError {
    (
        status_for(&error),
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

// ===== Handlers =====

/// GET /ping - Service version
pub async fn ping(State(control): State<AppState>) -> Json<PingResponse> {
    debug!("REST Ping request");
    Json(PingResponse {
        service_version: control.ping(),
    })
}

/// GET /processes - Every process in configuration order
pub async fn list_processes(State(control): State<AppState>) -> Json<ListProcessesResponse> {
    debug!("REST List request");
    let processes = control.list().await;
    debug!(count = processes.len(), "Processes listed");
    Json(ListProcessesResponse { processes })
}

/// POST /processes/:name/:action - Start, stop, kill or restart a process
pub async fn command_process(
    State(control): State<AppState>,
    Path((name, action)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, ApiError> {
    info!(process = %name, action = %action, "REST Command request");

    control.command(&name, &action).await.map_err(|e| {
        error!(process = %name, action = %action, error = %e, "Command failed");
        api_error(e)
    })?;

    Ok(Json(SuccessResponse {
        message: format!("{} {}: ok", action.to_lowercase(), name),
    }))
}
