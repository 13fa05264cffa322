use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use super::ChartSnapshot;
use crate::AppState;

// ─── GET /api/chart ──────────────────────────────────────────────
/// Every series, hidden ones included.

pub async fn get_chart(State(state): State<Arc<AppState>>) -> Json<ChartSnapshot> {
    Json(state.chart.snapshot())
}

// ─── GET /api/chart/visible ──────────────────────────────────────
/// Only the series a widget would currently draw.

pub async fn get_visible(State(state): State<Arc<AppState>>) -> Json<ChartSnapshot> {
    Json(state.chart.render())
}

// ─── GET /api/chart/stream ───────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes the render view as JSON every `stream_interval`.

pub async fn chart_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let interval = tokio::time::interval(state.stream_interval);

    let stream = IntervalStream::new(interval).map(move |_| {
        let view = state.chart.render();
        let json = serde_json::to_string(&view).unwrap_or_default();
        Ok(Event::default().event("chart").data(json))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
