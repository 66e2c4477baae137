//! Ops endpoint tests: metrics exposition and health probes.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::Value;
use tower::ServiceExt;

use voteboard::lifecycle::Shutdown;
use voteboard::observability::metrics;
use voteboard::observability::ops::{self, OpsState};
use voteboard::store::CounterStore;

mod common;

use common::MemoryStore;

async fn spawn_ops(store: Arc<MemoryStore>) -> (SocketAddr, Arc<Shutdown>) {
    let shutdown = Arc::new(Shutdown::new());
    let dyn_store: Arc<dyn CounterStore> = store;
    let state = OpsState {
        telemetry: common::shared_telemetry(),
        store: dyn_store,
        shutdown: shutdown.clone(),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = ops::serve(listener, state, rx).await;
    });

    (addr, shutdown)
}

#[tokio::test]
async fn healthz_reports_ok_and_version() {
    let (addr, shutdown) = spawn_ops(Arc::new(MemoryStore::new())).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/healthz", addr))
        .send()
        .await
        .expect("healthz");
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.expect("json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    shutdown.trigger();
}

#[tokio::test]
async fn readyz_follows_store_reachability() {
    let store = Arc::new(MemoryStore::new());
    let (addr, shutdown) = spawn_ops(store.clone()).await;
    let client = common::client();

    let res = client
        .get(format!("http://{}/readyz", addr))
        .send()
        .await
        .expect("readyz");
    assert_eq!(res.status(), 200);

    store.set_ping_failure(true);
    let res = client
        .get(format!("http://{}/readyz", addr))
        .send()
        .await
        .expect("readyz");
    assert_eq!(res.status(), 503);

    shutdown.trigger();
}

#[tokio::test]
async fn readyz_reports_draining_once_shutdown_is_triggered() {
    let shutdown = Arc::new(Shutdown::new());
    shutdown.trigger();

    let dyn_store: Arc<dyn CounterStore> = Arc::new(MemoryStore::new());
    let router = ops::router(OpsState {
        telemetry: common::shared_telemetry(),
        store: dyn_store,
        shutdown,
    });

    let request = axum::http::Request::builder()
        .uri("/readyz")
        .body(axum::body::Body::empty())
        .expect("request");
    let response = router.oneshot(request).await.expect("response");

    assert_eq!(response.status(), 503);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["status"], "draining");
}

#[tokio::test]
async fn metrics_exposition_includes_recorded_series() {
    let (addr, shutdown) = spawn_ops(Arc::new(MemoryStore::new())).await;
    metrics::record_vote("Cats");
    metrics::record_store_op("get", true);

    let client = common::client();
    let res = client
        .get(format!("http://{}/metrics", addr))
        .send()
        .await
        .expect("scrape");
    assert_eq!(res.status(), 200);

    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"));

    let body = res.text().await.expect("body");
    assert!(body.contains("voteboard_votes_total"));
    assert!(body.contains("voteboard_store_ops_total"));

    shutdown.trigger();
}

#[tokio::test]
async fn metrics_reflect_traffic_on_the_vote_surface() {
    let app = common::spawn_app().await;
    let client = common::client();

    client
        .post(app.url())
        .form(&[("vote", "Cats")])
        .send()
        .await
        .expect("vote");

    // Same process, same recorder: the scrape sees the vote traffic.
    let (ops_addr, shutdown) = spawn_ops(Arc::new(MemoryStore::new())).await;
    let body = client
        .get(format!("http://{}/metrics", ops_addr))
        .send()
        .await
        .expect("scrape")
        .text()
        .await
        .expect("body");

    assert!(body.contains("voteboard_votes_total"));
    assert!(body.contains("voteboard_requests_total"));

    shutdown.trigger();
    app.stop();
}
