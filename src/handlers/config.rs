use axum::{extract::State, Json};
use std::sync::Arc;

use crate::controller::ConfigRequest;
use crate::AppState;

use super::{ActionResult, AppError};

// ─── POST /api/config ────────────────────────────────────────────

pub async fn publish_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<ConfigRequest>,
) -> Result<Json<ActionResult>, AppError> {
    state.controller.publish(&config).await?;

    Ok(ActionResult::ok(format!(
        "Applied: {}% client→server drop, {}% server→client drop, window {}",
        config.client_server_drop_percent,
        config.server_client_drop_percent,
        config.window_size,
    )))
}

// ─── GET /api/config ─────────────────────────────────────────────

pub async fn current_config(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConfigRequest>, AppError> {
    Ok(Json(state.controller.fetch_config().await?))
}
