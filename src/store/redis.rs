//! Redis-backed counter store.
//!
//! # Responsibilities
//! - Connect to the configured Redis endpoint and verify it with PING
//! - Issue single best-effort GET/SET/INCRBY round trips
//! - Record per-operation metrics without influencing callers

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::config::StoreConfig;
use crate::observability::metrics;
use crate::store::{CounterStore, StoreResult};

/// Counter store client backed by a Redis connection manager.
///
/// The manager multiplexes commands over a single connection and
/// re-establishes it in the background after a failure; individual
/// commands are never retried here.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    host: String,
    port: u16,
}

impl RedisStore {
    /// Connect to the configured endpoint and verify reachability.
    ///
    /// Fails if the initial connection or the PING round trip fails; the
    /// caller decides whether that is fatal.
    pub async fn connect(cfg: &StoreConfig) -> StoreResult<Self> {
        let client = redis::Client::open(connection_info(cfg))?;
        let conn = client.get_connection_manager().await?;

        let store = Self {
            conn,
            host: cfg.host.clone(),
            port: cfg.port,
        };
        store.ping().await?;

        tracing::info!(host = %store.host, port = store.port, "Counter store connected");
        Ok(store)
    }
}

/// Build the connection parameters for the configured endpoint.
///
/// The port is part of the configuration rather than a URL so passwords
/// never need URL-escaping.
fn connection_info(cfg: &StoreConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(cfg.host.clone(), cfg.port),
        redis: RedisConnectionInfo {
            password: cfg.password.clone(),
            ..Default::default()
        },
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let res: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        metrics::record_store_op("ping", res.is_ok());
        res?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let res: redis::RedisResult<Option<String>> = conn.get(key).await;
        metrics::record_store_op("get", res.is_ok());
        Ok(res?)
    }

    async fn set(&self, key: &str, value: i64) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        let res: redis::RedisResult<()> = conn.set(key, value).await;
        metrics::record_store_op("set", res.is_ok());
        Ok(res?)
    }

    async fn incr(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let res: redis::RedisResult<i64> = conn.incr(key, delta).await;
        metrics::record_store_op("incr", res.is_ok());
        Ok(res?)
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
