//! Shared utilities for integration testing.
//!
//! Provides an in-memory counter store double and a helper that spins up
//! the full HTTP server on an ephemeral port.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::net::TcpListener;

use voteboard::http::{AppState, Board, VoteServer};
use voteboard::lifecycle::Shutdown;
use voteboard::observability::metrics::Telemetry;
use voteboard::store::{self, CounterStore, StoreError, StoreResult};

/// In-memory stand-in for the Redis-backed store.
///
/// Values are stored as strings, like the real thing, so malformed
/// payloads can be injected with [`MemoryStore::poison`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: DashMap<String, String>,
    fail_pings: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a raw, possibly non-numeric value under a key.
    pub fn poison(&self, key: &str, raw: &str) {
        self.map.insert(key.to_string(), raw.to_string());
    }

    /// Drop a key entirely.
    pub fn remove(&self, key: &str) {
        self.map.remove(key);
    }

    /// Make subsequent pings fail, as an unreachable store would.
    pub fn set_ping_failure(&self, fail: bool) {
        self.fail_pings.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        if self.fail_pings.load(Ordering::SeqCst) {
            return Err(StoreError::Command(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "ping refused",
            ))));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.map.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: i64) -> StoreResult<()> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut entry = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| "0".to_string());
        let current: i64 = entry.value().parse().map_err(|_| StoreError::NonNumeric {
            key: key.to_string(),
            raw: entry.value().clone(),
        })?;
        let next = current + delta;
        *entry.value_mut() = next.to_string();
        Ok(next)
    }
}

/// Telemetry for tests. The metrics recorder is global to the process,
/// so every test in a binary shares one handle.
pub fn shared_telemetry() -> Telemetry {
    static TELEMETRY: OnceLock<Telemetry> = OnceLock::new();
    TELEMETRY
        .get_or_init(|| Telemetry::init().expect("telemetry init"))
        .clone()
}

/// A running server plus handles to poke at its internals.
pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Arc<MemoryStore>,
    pub shutdown: Arc<Shutdown>,
}

impl TestApp {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Start the full server on an ephemeral port with the default board.
pub async fn spawn_app() -> TestApp {
    spawn_app_with("Cats", "Dogs").await
}

/// Start the full server with custom button labels.
pub async fn spawn_app_with(button1: &str, button2: &str) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    store::seed(store.as_ref(), &[button1, button2])
        .await
        .expect("seed counters");

    let dyn_store: Arc<dyn CounterStore> = store.clone();
    let state = AppState {
        store: dyn_store,
        board: Arc::new(Board {
            button1: button1.to_string(),
            button2: button2.to_string(),
            title: "Vote Board".to_string(),
        }),
        telemetry: shared_telemetry(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let shutdown = Arc::new(Shutdown::new());
    let rx = shutdown.subscribe();

    let server = VoteServer::new(state);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestApp {
        addr,
        store,
        shutdown,
    }
}

/// HTTP client that never picks up a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("build client")
}
