mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use proxy_telemetry::chart::SeriesId;
use proxy_telemetry::poll_loop::SampleSink;
use proxy_telemetry::reset::reset_all;
use proxy_telemetry::{ConfigRequest, ControllerClient, LiveChart, PollLoop, TelemetryError};

use common::{reference_sample, spawn_controller};

fn client(base_url: &str) -> ControllerClient {
    ControllerClient::new(base_url, Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn fetch_latest_decodes_controller_sample() {
    let controller = spawn_controller().await;
    *controller.state.sample.lock() = reference_sample();

    let sample = client(&controller.base_url).fetch_latest().await.unwrap();
    assert_eq!(sample, reference_sample());
}

#[tokio::test]
async fn server_error_is_a_transport_error() {
    let controller = spawn_controller().await;
    controller.state.fail_statistics.store(true, Ordering::SeqCst);

    let err = client(&controller.base_url).fetch_latest().await.unwrap_err();
    assert!(matches!(err, TelemetryError::Transport(ref msg) if msg.contains("500")));
}

#[tokio::test]
async fn malformed_sample_is_a_decode_error() {
    let controller = spawn_controller().await;
    controller.state.garble_statistics.store(true, Ordering::SeqCst);

    let err = client(&controller.base_url).fetch_latest().await.unwrap_err();
    assert!(matches!(err, TelemetryError::Decode(_)));
}

#[tokio::test]
async fn publish_sends_controller_field_names() {
    let controller = spawn_controller().await;
    let api = client(&controller.base_url);

    let config = ConfigRequest {
        client_server_drop_percent: 15,
        server_client_drop_percent: 30,
        window_size: 8,
    };
    api.publish(&config).await.unwrap();

    assert_eq!(controller.state.config_posts.load(Ordering::SeqCst), 1);
    assert_eq!(
        *controller.state.config.lock(),
        serde_json::json!({
            "client_server_drop": 15,
            "server_client_drop": 30,
            "window_size": 8,
        })
    );
    assert_eq!(api.fetch_config().await.unwrap(), config);
}

#[tokio::test]
async fn invalid_config_never_reaches_controller() {
    let controller = spawn_controller().await;
    let api = client(&controller.base_url);

    for bad in [
        ConfigRequest {
            client_server_drop_percent: 10,
            server_client_drop_percent: 10,
            window_size: 0,
        },
        ConfigRequest {
            client_server_drop_percent: -1,
            server_client_drop_percent: 10,
            window_size: 4,
        },
    ] {
        let err = api.publish(&bad).await.unwrap_err();
        assert!(matches!(err, TelemetryError::Validation(_)));
    }
    assert_eq!(controller.state.config_posts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn one_tick_appends_reference_values() {
    let controller = spawn_controller().await;
    *controller.state.sample.lock() = reference_sample();
    let chart = Arc::new(LiveChart::new());

    let before = chrono::Utc::now().timestamp_millis();
    let stats = PollLoop::new(
        client(&controller.base_url),
        chart.clone(),
        Duration::from_millis(20),
    )
    .with_tick_limit(1)
    .start()
    .finished()
    .await;
    let after = chrono::Utc::now().timestamp_millis();

    assert_eq!(stats.appended, 1);
    let snapshot = chart.snapshot();
    let values: Vec<u64> = snapshot.series.iter().map(|s| s.points[0].value).collect();
    assert_eq!(values, [10, 8, 10, 9, 9, 7]);
    for series in &snapshot.series {
        assert_eq!(series.points.len(), 1);
        let ts = series.points[0].timestamp_ms;
        assert!(before <= ts && ts <= after);
        assert_eq!(ts, snapshot.series[0].points[0].timestamp_ms);
    }
}

#[tokio::test]
async fn failing_controller_leaves_gaps_not_duplicates() {
    let controller = spawn_controller().await;
    *controller.state.sample.lock() = reference_sample();
    controller.state.fail_statistics.store(true, Ordering::SeqCst);
    let chart = Arc::new(LiveChart::new());

    let stats = PollLoop::new(
        client(&controller.base_url),
        chart.clone(),
        Duration::from_millis(10),
    )
    .with_tick_limit(3)
    .start()
    .finished()
    .await;

    assert_eq!(stats.failed, 3);
    assert!(chart.is_empty());
    assert_eq!(controller.state.stat_reads.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn reset_all_zeroes_both_sides() {
    let controller = spawn_controller().await;
    *controller.state.sample.lock() = reference_sample();
    let api = client(&controller.base_url);
    let chart = LiveChart::new();
    chart.set_visible(SeriesId::ProxyRecv, true);
    chart.on_sample(chart.generation(), api.fetch_latest().await.unwrap(), 1);

    reset_all(&api, &chart).await.unwrap();

    assert!(chart.is_empty());
    assert!(chart.is_visible(SeriesId::ProxyRecv));
    assert_eq!(controller.state.resets.load(Ordering::SeqCst), 1);
    assert_eq!(api.fetch_latest().await.unwrap(), Default::default());
}
