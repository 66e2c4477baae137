//! Ops endpoint: metrics exposition and health probes.
//!
//! # Responsibilities
//! - Serve `/metrics` in Prometheus text exposition format
//! - Serve `/healthz` (liveness) and `/readyz` (readiness) probes
//! - Stay off the vote surface by listening on its own address
//!
//! # Design Decisions
//! - Readiness pings the counter store; a probe must fail when the store
//!   is unreachable so traffic drains before votes start erroring
//! - Once shutdown is triggered, readiness reports draining without
//!   touching the store
//! - Shed load instead of queueing; a scrape backlog must never grow

use std::sync::Arc;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{BoxError, ServiceBuilder};

use crate::lifecycle::Shutdown;
use crate::observability::metrics::Telemetry;
use crate::store::CounterStore;

/// Content type Prometheus scrapers expect from a text endpoint.
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Concurrent in-flight requests allowed on the ops listener.
const OPS_CONCURRENCY: usize = 16;

/// State shared by the ops handlers.
#[derive(Clone)]
pub struct OpsState {
    pub telemetry: Telemetry,
    pub store: Arc<dyn CounterStore>,
    pub shutdown: Arc<Shutdown>,
}

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ReadyStatus {
    status: &'static str,
    store: &'static str,
}

/// Build the ops router with its load-shedding middleware.
pub fn router(state: OpsState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .load_shed()
                .concurrency_limit(OPS_CONCURRENCY),
        )
}

/// Serve the ops endpoints until shutdown is signalled.
pub async fn serve(
    listener: TcpListener,
    state: OpsState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    tracing::info!(address = %address, "Ops endpoint listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        format!("ops endpoint unavailable: {err}"),
    )
}

async fn metrics_handler(State(state): State<OpsState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.telemetry.render(),
    )
}

async fn healthz_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn readyz_handler(State(state): State<OpsState>) -> Response {
    if state.shutdown.is_triggered() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyStatus {
                status: "draining",
                store: "unknown",
            }),
        )
            .into_response();
    }

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyStatus {
                status: "ready",
                store: "reachable",
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::warn!(error = %error, "Readiness probe could not reach the counter store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyStatus {
                    status: "not ready",
                    store: "unreachable",
                }),
            )
                .into_response()
        }
    }
}
