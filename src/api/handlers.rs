//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::state::{AppState, Mode, Presets};

use super::responses::{ApiResponse, HealthResponse, StatusResponse};

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.start() {
        Ok(timer) => {
            info!("Start endpoint called - countdown running");
            Ok(Json(ApiResponse::for_timer(
                "Countdown started".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to start countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /pause - Pause the countdown, keeping the remaining time
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.pause() {
        Ok(timer) => {
            info!("Pause endpoint called - countdown paused");
            Ok(Json(ApiResponse::for_timer(
                "Countdown paused".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to pause countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /reset - Restore the full session duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.reset() {
        Ok(timer) => {
            info!("Reset endpoint called - countdown reset");
            Ok(Json(ApiResponse::for_timer(
                "Countdown reset".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to reset countdown: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /mode/{mode} - Select a preset mode (focus, short, long)
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode): Path<Mode>,
) -> Result<Json<ApiResponse>, StatusCode> {
    match state.select_mode(mode) {
        Ok(timer) => {
            info!("Mode endpoint called - {} mode selected", mode.as_str());
            Ok(Json(ApiResponse::for_timer(
                format!("Switched to {} mode", mode.as_str()),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to switch mode: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle PUT /presets - Replace the preset minute values
pub async fn presets_handler(
    State(state): State<Arc<AppState>>,
    Json(presets): Json<Presets>,
) -> Result<Json<ApiResponse>, StatusCode> {
    if let Err(e) = presets.validate() {
        warn!("Rejecting presets: {}", e);
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    match state.apply_presets(presets) {
        Ok(timer) => {
            info!("Presets endpoint called - presets saved");
            Ok(Json(ApiResponse::for_timer(
                "Presets saved".to_string(),
                timer,
            )))
        }
        Err(e) => {
            error!("Failed to apply presets: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle GET /status - Return the current timer status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let presets = match state.presets() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to get presets: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        presets,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
