//! HTTP server exposing Prometheus metrics
//!
//! Runs on METRICS_PORT when set:
//! - /metrics - Prometheus text format
//! - /health  - liveness with uptime and pending submission count

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Instant;

use crate::moderation::registry::Registry;

#[derive(Clone)]
struct AppState {
    start_time: Instant,
    registry: Registry,
}

/// Builds the router; split out so it can be served from tests.
pub fn metrics_router(registry: Registry) -> Router {
    let state = AppState {
        start_time: Instant::now(),
        registry,
    };

    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(Arc::new(state))
}

/// Start the metrics HTTP server on `0.0.0.0:port`
pub async fn start_metrics_server(port: u16, registry: Registry) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    log::info!("Starting metrics server on http://{}", addr);
    log::info!("  /metrics - Prometheus metrics");
    log::info!("  /health  - Health check (liveness)");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, metrics_router(registry)).await?;

    Ok(())
}

/// All registered metrics in Prometheus text exposition format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

async fn metrics_handler() -> Response {
    match render_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            log::error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode metrics: {}", e)).into_response()
        }
    }
}

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = serde_json::json!({
        "status": "healthy",
        "uptime_seconds": state.start_time.elapsed().as_secs(),
        "pending_submissions": state.registry.len().await,
        "service": "shutter",
        "version": env!("CARGO_PKG_VERSION"),
    });

    (StatusCode::OK, axum::Json(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PhotoRef, SubmitterId};

    #[tokio::test]
    async fn test_health_reports_pending_count() {
        let registry = Registry::new();
        registry.register(PhotoRef("file".to_string()), SubmitterId(1)).await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = metrics_router(registry);
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let response = reqwest::get(format!("http://{}/health", addr)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body = response.json::<serde_json::Value>().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["pending_submissions"], 1);
    }
}
