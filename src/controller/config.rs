use serde::{Deserialize, Serialize};

use super::{expect_success, ControllerClient};
use crate::error::TelemetryError;

/// Run-time knobs pushed to the controller.
///
/// Serializes with the controller's field names. The fields are signed so
/// that bad operator input reaches [`ConfigRequest::validate`] instead of
/// failing somewhere inside the JSON extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRequest {
    /// Percent of client → server packets the proxy drops (0–100)
    #[serde(rename = "client_server_drop")]
    pub client_server_drop_percent: i64,

    /// Percent of server → client packets the proxy drops (0–100)
    #[serde(rename = "server_client_drop")]
    pub server_client_drop_percent: i64,

    /// Flow-control window, forwarded as-is
    pub window_size: i64,
}

impl ConfigRequest {
    pub fn validate(&self) -> Result<(), TelemetryError> {
        if !(0..=100).contains(&self.client_server_drop_percent) {
            return Err(TelemetryError::Validation(format!(
                "client_server_drop must be between 0 and 100, got {}",
                self.client_server_drop_percent
            )));
        }
        if !(0..=100).contains(&self.server_client_drop_percent) {
            return Err(TelemetryError::Validation(format!(
                "server_client_drop must be between 0 and 100, got {}",
                self.server_client_drop_percent
            )));
        }
        if self.window_size <= 0 {
            return Err(TelemetryError::Validation(format!(
                "window_size must be positive, got {}",
                self.window_size
            )));
        }
        Ok(())
    }
}

impl ControllerClient {
    // ─── POST /config ────────────────────────────────────────────
    /// Validate locally, then submit. Invalid input never hits the wire.
    pub async fn publish(&self, config: &ConfigRequest) -> Result<(), TelemetryError> {
        config.validate()?;

        let response = self.post("/config").json(config).send().await?;
        expect_success(response).await?;

        tracing::info!(
            cs_drop = config.client_server_drop_percent,
            sc_drop = config.server_client_drop_percent,
            window = config.window_size,
            "published configuration"
        );
        Ok(())
    }

    // ─── GET /config ─────────────────────────────────────────────
    /// Read back whatever configuration the controller is running with.
    pub async fn fetch_config(&self) -> Result<ConfigRequest, TelemetryError> {
        let response = self.get("/config").send().await?;
        let body = expect_success(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
