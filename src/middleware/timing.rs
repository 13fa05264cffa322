use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::Instant;

/// Request logging for the operator API.
///
/// Adds `X-Response-Time-Us` and `Server-Timing` headers and logs one
/// line per `/api/` call. The SSE stream gets neither.
pub async fn timing_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();
    let us = elapsed.as_micros();

    // The chart stream returns as soon as headers are ready, so its
    // timing says nothing about the controller round-trip.
    let streaming = path.ends_with("/stream");
    if !streaming {
        let headers = response.headers_mut();
        if let Ok(val) = HeaderValue::from_str(&us.to_string()) {
            headers.insert("x-response-time-us", val);
        }
        let server_timing = format!("api;dur={:.3}", elapsed.as_secs_f64() * 1000.0);
        if let Ok(val) = HeaderValue::from_str(&server_timing) {
            headers.insert("server-timing", val);
        }
    }

    let status = response.status().as_u16();
    if path.starts_with("/api/") && !streaming {
        if status >= 500 {
            tracing::warn!(%method, %path, status, us = us as u64, "request failed");
        } else {
            tracing::info!(%method, %path, status, us = us as u64, "request");
        }
    }

    response
}
