// HTTP request handlers
use crate::application::render_surface::ValueRange;
use crate::application::view_runtime::ViewEvent;
use crate::domain::time_window::{RangePreset, TimeWindow};
use crate::infrastructure::chunked_json::stream_response;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PointerMove {
    pub x: f64,
}

/// Axis ranges the chart client drew after the user panned or zoomed.
#[derive(Deserialize)]
pub struct Relayout {
    #[serde(default)]
    pub x_range: Option<TimeWindow>,
    #[serde(default)]
    pub y_range: Option<ValueRange>,
}

#[derive(Deserialize)]
pub struct AutoUpdateToggle {
    pub enabled: bool,
}

#[derive(Deserialize)]
pub struct RangeSelection {
    pub preset: RangePreset,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current frame and status
pub async fn get_view(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.feed.snapshot();
    match json_response(&snapshot, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Stream frames and status changes as they happen
pub async fn stream_view(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_response(state.feed.messages(), accepts_brotli(&headers))
}

pub async fn pointer_moved(
    State(state): State<Arc<AppState>>,
    Json(pointer): Json<PointerMove>,
) -> StatusCode {
    if !pointer.x.is_finite() {
        return StatusCode::UNPROCESSABLE_ENTITY;
    }
    dispatch(&state, ViewEvent::PointerMoved(pointer.x)).await
}

pub async fn relayout(
    State(state): State<Arc<AppState>>,
    Json(relayout): Json<Relayout>,
) -> StatusCode {
    let y_range = match relayout.y_range {
        Some(range) if !range.is_valid() => return StatusCode::UNPROCESSABLE_ENTITY,
        other => other,
    };
    state.feed.report_relayout(relayout.x_range, y_range);
    StatusCode::NO_CONTENT
}

pub async fn set_auto_update(
    State(state): State<Arc<AppState>>,
    Json(toggle): Json<AutoUpdateToggle>,
) -> StatusCode {
    dispatch(&state, ViewEvent::SetAutoUpdate(toggle.enabled)).await
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> StatusCode {
    dispatch(&state, ViewEvent::Refresh).await
}

pub async fn select_range(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<RangeSelection>,
) -> StatusCode {
    dispatch(&state, ViewEvent::SelectRange(selection.preset)).await
}

async fn dispatch(state: &AppState, event: ViewEvent) -> StatusCode {
    match state.view.send(event).await {
        Ok(()) => StatusCode::ACCEPTED,
        Err(e) => {
            tracing::error!("Error dispatching view event: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
