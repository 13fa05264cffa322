//! Typed HTTP client for the proxy harness controller.
//!
//! The controller is a black box that exposes three operations:
//! `GET /statistics`, `DELETE /statistics` and `POST /config` (plus a
//! `GET /config` read-back). Each operation is a single attempt; retrying
//! is the caller's business.

pub mod config;
pub mod statistics;

pub use config::ConfigRequest;
pub use statistics::Sample;

use std::time::Duration;

use reqwest::Client;

use crate::error::TelemetryError;

/// A cheaply cloneable handle to one controller.
#[derive(Debug, Clone)]
pub struct ControllerClient {
    base_url: String,
    http: Client,
}

impl ControllerClient {
    /// Build a client for `base_url` (e.g. `"http://127.0.0.1:5000"`).
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TelemetryError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelemetryError::Transport(format!("building HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path))
    }

    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path))
    }

    pub(crate) fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.delete(self.url(path))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turn any non-2xx answer into a transport error carrying the body.
pub(crate) async fn expect_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, TelemetryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(TelemetryError::Transport(format!(
        "controller answered {}: {}",
        status.as_u16(),
        body.trim()
    )))
}
