//! Prometheus metrics.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

/// HTTP request metric (counter, labels: method, path, status).
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Render handle for `GET /metrics`, absent when the recorder could not
/// be installed (a second instance in one process, as in tests).
pub type MetricsHandle = Option<PrometheusHandle>;

/// Install the Prometheus recorder.
#[must_use]
pub fn install() -> MetricsHandle {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("metrics recorder not installed: {e}");
            None
        }
    }
}

/// Middleware counting requests by method, matched route, and status.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_owned(), |p| p.as_str().to_owned());

    let response = next.run(request).await;

    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method,
        "path" => path,
        "status" => response.status().as_u16().to_string()
    )
    .increment(1);
    response
}
