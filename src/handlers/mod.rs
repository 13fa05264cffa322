pub mod config;
pub mod series;
pub mod statistics;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::TelemetryError;

// ─── Shared acknowledgement ──────────────────────────────────────

/// Body returned by operator actions so the UI can show a notice.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResult {
    pub ok: bool,
    pub message: String,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            ok: true,
            message: message.into(),
        })
    }
}

// ─── Unified error type ──────────────────────────────────────────

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Validation(String),
    /// Controller could not be reached or answered badly.
    Upstream(String),
}

impl From<TelemetryError> for AppError {
    fn from(err: TelemetryError) -> Self {
        match err {
            TelemetryError::Validation(msg) => Self::Validation(msg),
            other @ (TelemetryError::Transport(_) | TelemetryError::Decode(_)) => {
                Self::Upstream(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            Self::Upstream(msg) => {
                (StatusCode::BAD_GATEWAY, format!("Controller: {msg}"))
            }
        };

        let body = serde_json::json!({
            "ok":     false,
            "error":  message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
