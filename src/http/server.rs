//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the vote handlers
//! - Wire up middleware (request ID, tracing, request metrics)
//! - Resolve the board (labels and title) from configuration
//! - Bind the server to a listener and drain on shutdown
//!
//! # Design Decisions
//! - One path, two verbs; everything else is middleware
//! - Request IDs are UUIDv4, set on ingress and echoed on responses
//! - Request metrics are recorded in middleware so rejected and failed
//!   requests are still counted

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::config::VoteConfig;
use crate::http::handlers;
use crate::observability::metrics::{self, Telemetry};
use crate::store::CounterStore;

/// Button labels and page title, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Board {
    pub button1: String,
    pub button2: String,
    pub title: String,
}

impl Board {
    /// Resolve the board from configuration. With `show_host` set the
    /// page title becomes the hostname, which is how a multi-replica
    /// deployment shows which instance served the page.
    pub fn from_config(config: &VoteConfig) -> Self {
        let title = if config.show_host {
            gethostname::gethostname().to_string_lossy().into_owned()
        } else {
            config.title.clone()
        };
        Self {
            button1: config.button1.clone(),
            button2: config.button2.clone(),
            title,
        }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CounterStore>,
    pub board: Arc<Board>,
    pub telemetry: Telemetry,
}

/// Request ID source: one UUIDv4 per request.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// HTTP server for the voting surface.
pub struct VoteServer {
    router: Router,
}

impl VoteServer {
    /// Create a new server around the shared application state.
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::index).post(handlers::vote))
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let address = listener.local_addr()?;
        tracing::info!(address = %address, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Record count and latency for every response, including rejections
/// that never reach a handler body.
async fn track_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), started);
    response
}
