//! Health check and metrics endpoint
//!
//! # Endpoints
//!
//! - `GET /ready` - `200` when the cache answers a ping, `503` otherwise
//! - `GET /metrics` - Prometheus metrics in text format

use crate::cache::Cache;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Health server errors
#[derive(Debug, Error)]
pub enum HealthServerError {
    /// Listener could not bind
    #[error("Failed to bind health server on {0}: {1}")]
    BindFailed(String, String),
    /// Server stopped with an error
    #[error("Health server failed: {0}")]
    ServerFailed(String),
}

/// Shared state for the health handlers
pub struct HealthState {
    cache: Arc<dyn Cache>,
    metrics: Option<PrometheusHandle>,
}

impl HealthState {
    /// Create health state; `metrics` is `None` when no recorder is installed
    pub fn new(cache: Arc<dyn Cache>, metrics: Option<PrometheusHandle>) -> Self {
        Self { cache, metrics }
    }
}

/// Build the health router
pub fn router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/ready", get(readiness_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Health check HTTP server
pub struct HealthServer {
    listener: TcpListener,
    state: Arc<HealthState>,
    cancel: CancellationToken,
}

impl HealthServer {
    /// Bind the health server
    pub async fn bind(
        addr: &str,
        state: Arc<HealthState>,
        cancel: &CancellationToken,
    ) -> Result<Self, HealthServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HealthServerError::BindFailed(addr.to_string(), e.to_string()))?;

        Ok(Self {
            listener,
            state,
            cancel: cancel.child_token(),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }

    /// Run the health server until cancelled
    pub async fn run(self) -> Result<(), HealthServerError> {
        tracing::info!(addr = ?self.local_addr(), "Health server listening");

        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| HealthServerError::ServerFailed(e.to_string()))?;

        tracing::info!("Health server stopped");
        Ok(())
    }
}

async fn readiness_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let status = match state.cache.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Cache ping failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };
    (status, Json(status.as_u16()))
}

async fn metrics_handler(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), elapsed_ms, "Request completed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, "Request completed");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "Request completed");
    }

    response
}
