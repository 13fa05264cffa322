use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chart::SeriesId;
use crate::AppState;

use super::AppError;

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct VisibilityState {
    pub id: SeriesId,
    pub name: &'static str,
    pub visible: bool,
}

fn parse_id(key: &str) -> Result<SeriesId, AppError> {
    SeriesId::from_key(key).ok_or_else(|| AppError::NotFound(format!("no series '{key}'")))
}

// ─── PUT /api/series/:id/visibility ──────────────────────────────

pub async fn set_visibility(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(req): Json<VisibilityRequest>,
) -> Result<Json<VisibilityState>, AppError> {
    let id = parse_id(&key)?;
    state.chart.set_visible(id, req.visible);

    Ok(Json(VisibilityState {
        id,
        name: id.display_name(),
        visible: req.visible,
    }))
}

// ─── POST /api/series/:id/toggle ─────────────────────────────────

pub async fn toggle_visibility(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<VisibilityState>, AppError> {
    let id = parse_id(&key)?;
    let visible = state.chart.toggle(id);

    Ok(Json(VisibilityState {
        id,
        name: id.display_name(),
        visible,
    }))
}
