use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::poll_loop::PollStatsSnapshot;
use crate::reset::reset_all;
use crate::AppState;

use super::{ActionResult, AppError};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub controller: String,
    pub polling: bool,
    pub points: usize,
    pub poll: PollStatsSnapshot,
}

// ─── POST /api/reset ─────────────────────────────────────────────
/// Local chart is cleared even when the controller call fails; the
/// failure is still reported so the operator knows the counters survive.

pub async fn reset(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActionResult>, AppError> {
    reset_all(&state.controller, &state.chart).await?;
    Ok(ActionResult::ok("Statistics reset"))
}

// ─── GET /api/status ─────────────────────────────────────────────

pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        controller: state.controller.base_url().to_string(),
        polling: state
            .poll_stats
            .as_ref()
            .is_some_and(|reader| reader.is_running()),
        points: state.chart.len(),
        poll: state
            .poll_stats
            .as_ref()
            .map(|reader| reader.snapshot())
            .unwrap_or_default(),
    })
}
