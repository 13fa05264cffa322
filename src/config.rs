use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use url::Url;

/// Command-line options. Logging verbosity comes from `RUST_LOG`.
#[derive(Parser, Debug, Clone)]
#[clap(
    about = "Live traffic telemetry for the proxy test harness",
    version
)]
pub struct Cli {
    #[clap(
        long,
        default_value = "http://127.0.0.1:5000",
        help = "Base URL of the harness controller"
    )]
    pub controller_url: Url,

    #[clap(
        long,
        default_value = "0.0.0.0:3000",
        help = "Address the operator API listens on"
    )]
    pub listen: SocketAddr,

    #[clap(
        long,
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Milliseconds between statistics polls"
    )]
    pub poll_interval_ms: u64,

    #[clap(
        long,
        default_value_t = 2000,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Timeout for each controller request, in milliseconds"
    )]
    pub request_timeout_ms: u64,

    #[clap(
        long,
        default_value_t = 500,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Milliseconds between chart pushes on the SSE stream"
    )]
    pub stream_interval_ms: u64,
}

/// Startup configuration that parsed but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("controller URL must use http or https, got scheme \"{0}\"")]
    UnsupportedScheme(String),

    #[error("controller URL \"{0}\" has no host")]
    MissingHost(String),
}

/// Validated runtime settings derived from [`Cli`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub controller_url: Url,
    pub listen: SocketAddr,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub stream_interval: Duration,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let url = cli.controller_url;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost(url.to_string()));
        }

        Ok(Self {
            controller_url: url,
            listen: cli.listen,
            poll_interval: Duration::from_millis(cli.poll_interval_ms),
            request_timeout: Duration::from_millis(cli.request_timeout_ms),
            stream_interval: Duration::from_millis(cli.stream_interval_ms),
        })
    }
}
