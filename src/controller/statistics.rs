use serde::{Deserialize, Serialize};

use super::{expect_success, ControllerClient};
use crate::error::TelemetryError;

/// One observation of the six cumulative traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub client_sent: u64,
    pub client_recv: u64,
    pub proxy_sent: u64,
    pub proxy_recv: u64,
    pub server_sent: u64,
    pub server_recv: u64,
}

/// Body of `GET /statistics`.
#[derive(Debug, Deserialize)]
struct StatisticsResponse {
    sample: Sample,
}

impl ControllerClient {
    // ─── GET /statistics ─────────────────────────────────────────
    /// Fetch the controller's current counters.
    pub async fn fetch_latest(&self) -> Result<Sample, TelemetryError> {
        let response = self.get("/statistics").send().await?;
        let body = expect_success(response).await?.text().await?;
        decode_sample(&body)
    }

    // ─── DELETE /statistics ──────────────────────────────────────
    /// Ask the controller to zero its counters. The response body is ignored.
    pub async fn reset_statistics(&self) -> Result<(), TelemetryError> {
        let response = self.delete("/statistics").send().await?;
        expect_success(response).await?;
        Ok(())
    }
}

/// Validate a `/statistics` body against the six-integer shape.
///
/// Missing counters, negative or fractional values, and non-numeric
/// values are all rejected as [`TelemetryError::Decode`].
pub fn decode_sample(body: &str) -> Result<Sample, TelemetryError> {
    let parsed: StatisticsResponse = serde_json::from_str(body)?;
    Ok(parsed.sample)
}
