//! In-process stand-in for the harness controller.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use proxy_telemetry::Sample;

#[derive(Default)]
pub struct MockController {
    pub sample: Mutex<Sample>,
    pub config: Mutex<Value>,
    pub config_posts: AtomicU64,
    pub stat_reads: AtomicU64,
    pub resets: AtomicU64,
    /// Answer `/statistics` with a 500.
    pub fail_statistics: AtomicBool,
    /// Answer `/statistics` with a body that is not a sample.
    pub garble_statistics: AtomicBool,
}

pub struct RunningController {
    pub base_url: String,
    pub state: Arc<MockController>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for RunningController {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

async fn load_stats(State(state): State<Arc<MockController>>) -> impl IntoResponse {
    state.stat_reads.fetch_add(1, Ordering::SeqCst);
    if state.fail_statistics.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "boom"})));
    }
    if state.garble_statistics.load(Ordering::SeqCst) {
        return (StatusCode::OK, Json(json!({"sample": {"client_sent": "lots"}})));
    }
    let sample = *state.sample.lock();
    (StatusCode::OK, Json(json!({ "sample": sample })))
}

async fn reset_stats(State(state): State<Arc<MockController>>) -> impl IntoResponse {
    state.resets.fetch_add(1, Ordering::SeqCst);
    *state.sample.lock() = Sample::default();
    ""
}

async fn apply_config(
    State(state): State<Arc<MockController>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.config_posts.fetch_add(1, Ordering::SeqCst);
    *state.config.lock() = body;
    ""
}

async fn get_config(State(state): State<Arc<MockController>>) -> Json<Value> {
    Json(state.config.lock().clone())
}

pub async fn spawn_controller() -> RunningController {
    let state = Arc::new(MockController {
        config: Mutex::new(json!({
            "client_server_drop": 0,
            "server_client_drop": 0,
            "window_size": 1,
        })),
        ..Default::default()
    });

    let app = Router::new()
        .route("/statistics", get(load_stats).delete(reset_stats))
        .route("/config", post(apply_config).get(get_config))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    RunningController {
        base_url,
        state,
        shutdown: Some(shutdown_tx),
    }
}

pub fn reference_sample() -> Sample {
    Sample {
        client_sent: 10,
        client_recv: 8,
        proxy_sent: 10,
        proxy_recv: 9,
        server_sent: 9,
        server_recv: 7,
    }
}
