//! Live telemetry client for the proxy test harness.
//!
//! Polls the controller's traffic counters into six time-series, and
//! exposes an operator API for pushing drop-rate / window configuration
//! and resetting statistics.

use std::sync::Arc;
use std::time::Duration;

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod poll_loop;
pub mod reset;
pub mod server;

pub use chart::LiveChart;
pub use controller::{ConfigRequest, ControllerClient, Sample};
pub use error::TelemetryError;
pub use poll_loop::{PollHandle, PollLoop};

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Cloneable HTTP client for the controller.
    pub controller: ControllerClient,

    /// The six series, shared with the poll loop.
    pub chart: Arc<LiveChart>,

    /// Counters of the running poll loop, if one was attached.
    pub poll_stats: Option<poll_loop::PollStatsReader>,

    /// How often the SSE stream pushes a chart view.
    pub stream_interval: Duration,
}
