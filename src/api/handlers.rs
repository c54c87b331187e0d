//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info, warn};

use crate::{
    state::{AppState, NewTimer, Timer, TimerUpdate},
    validation::{validate_timer_form, TimerForm, ValidationError},
};
use super::responses::{
    ErrorResponse, HealthResponse, PhaseCounts, StatusResponse, TimerView, TimersResponse,
};

/// Failure modes of the timer endpoints
#[derive(Debug)]
pub enum ApiError {
    Invalid(ValidationError),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Invalid(e) => {
                warn!("Rejected timer form: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::NotFound(id) => (StatusCode::NOT_FOUND, format!("Timer {} not found", id)),
            ApiError::Internal(e) => {
                error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

fn found(id: &str, timer: Option<Timer>) -> Result<Json<TimerView>, ApiError> {
    timer
        .map(|t| Json(TimerView::from(t)))
        .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

/// Handle GET /timers - List timers in creation order
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimersResponse>, ApiError> {
    let timers = state.timers().map_err(ApiError::Internal)?;
    Ok(Json(TimersResponse::new(timers)))
}

/// Handle POST /timers - Validate the form and add an idle timer
pub async fn add_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<TimerForm>,
) -> Result<(StatusCode, Json<TimerView>), ApiError> {
    let duration = validate_timer_form(&form).map_err(ApiError::Invalid)?;
    let timer = state
        .add(NewTimer::idle(form.title.trim(), form.description, duration))
        .map_err(ApiError::Internal)?;
    Ok((StatusCode::CREATED, Json(TimerView::from(timer))))
}

/// Handle PATCH /timers/:id - Validate the form and edit the timer
pub async fn edit_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(form): Json<TimerForm>,
) -> Result<Json<TimerView>, ApiError> {
    let duration = validate_timer_form(&form).map_err(ApiError::Invalid)?;
    let updates = TimerUpdate::default()
        .title(form.title.trim())
        .description(form.description)
        .duration(duration);
    let timer = state.edit(&id, updates).map_err(ApiError::Internal)?;
    found(&id, timer)
}

/// Handle DELETE /timers/:id - Remove the timer and silence its alert
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.delete(&id).map_err(ApiError::Internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle POST /timers/:id/toggle - Pause or resume
///
/// A completed timer stays stopped; clients offering a single start/stop
/// control should call `/timers/:id/restart` when `phase` is `completed`.
pub async fn toggle_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerView>, ApiError> {
    let timer = state.toggle(&id).map_err(ApiError::Internal)?;
    found(&id, timer)
}

/// Handle POST /timers/:id/restart - Reset to the full duration
pub async fn restart_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerView>, ApiError> {
    let timer = state.restart(&id).map_err(ApiError::Internal)?;
    found(&id, timer)
}

/// Handle POST /timers/:id/dismiss - Acknowledge a completion alert
pub async fn dismiss_alert_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    info!("Dismissing alert for timer {}", id);
    state.dismiss(&id);
    StatusCode::NO_CONTENT
}

/// Handle GET /status - Return current service status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let timers = state.timers().map_err(ApiError::Internal)?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        total_timers: timers.len(),
        phases: PhaseCounts::tally(&timers),
        active_alerts: state.active_alerts(),
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
