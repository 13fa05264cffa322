use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use proxy_telemetry::config::{Cli, Settings};
use proxy_telemetry::{server, AppState, ControllerClient, LiveChart, PollLoop};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── 1. Settings ──────────────────────────────────────────────
    let settings = match Settings::from_cli(Cli::parse()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(2);
        }
    };

    // ── 2. Controller client ─────────────────────────────────────
    let controller =
        match ControllerClient::new(settings.controller_url.as_str(), settings.request_timeout) {
            Ok(client) => client,
            Err(err) => {
                tracing::error!(error = %err, "cannot build controller client");
                std::process::exit(1);
            }
        };
    tracing::info!(controller = controller.base_url(), "using controller");

    // ── 3. Chart + poll loop ─────────────────────────────────────
    let chart = Arc::new(LiveChart::new());
    let poll = PollLoop::new(controller.clone(), chart.clone(), settings.poll_interval).start();

    // ── 4. Shared state & router ─────────────────────────────────
    let state = Arc::new(AppState {
        controller,
        chart: chart.clone(),
        poll_stats: Some(poll.stats_reader()),
        stream_interval: settings.stream_interval,
    });
    let app = server::create_router(state);

    // ── 5. Bind & serve ──────────────────────────────────────────
    let listener = match tokio::net::TcpListener::bind(settings.listen).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(addr = %settings.listen, error = %err, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("operator API listening on http://{}", settings.listen);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await;

    // ── 6. Teardown ──────────────────────────────────────────────
    let stats = poll.stop().await;
    chart.dispose();
    tracing::info!(
        ticks = stats.ticks,
        appended = stats.appended,
        failed = stats.failed,
        "poll loop drained"
    );

    if let Err(err) = served {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}
