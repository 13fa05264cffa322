use thiserror::Error;

/// Everything that can go wrong while talking to the controller or
/// accepting operator input. None of these are fatal to the client.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Request never completed: connection refused, timeout, or a
    /// non-2xx status from the controller.
    #[error("transport error: {0}")]
    Transport(String),

    /// The controller answered, but not with the shape we expect.
    #[error("decode error: {0}")]
    Decode(String),

    /// Operator-supplied configuration is out of range.
    #[error("validation error: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for TelemetryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TelemetryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
