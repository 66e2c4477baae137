//! Voteboard: a two-button voting web service.
//!
//! Serves one page with two vote buttons and a reset button. Tallies live
//! in Redis so every replica shows the same numbers.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                   VOTEBOARD                   │
//!                     │                                               │
//!   GET / , POST /    │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!   ──────────────────┼─▶│  http   │───▶│ handlers │───▶│  store  │──┼──▶ Redis
//!                     │  │ server  │    │ + page   │    │ client  │  │
//!                     │  └─────────┘    └──────────┘    └─────────┘  │
//!                     │                                               │
//!   /metrics /readyz  │  ┌─────────┐                                  │
//!   ──────────────────┼─▶│   ops   │                                  │
//!                     │  └─────────┘                                  │
//!                     │                                               │
//!                     │  ┌─────────────────────────────────────────┐  │
//!                     │  │          Cross-Cutting Concerns         │  │
//!                     │  │   config    lifecycle    observability  │  │
//!                     │  └─────────────────────────────────────────┘  │
//!                     └───────────────────────────────────────────────┘
//! ```
//!
//! # Startup Order
//!
//! Config, then telemetry, then the counter store, then listeners. A
//! store that cannot be reached is fatal; the process exits instead of
//! serving a page it cannot back.

use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use voteboard::config;
use voteboard::http::{AppState, Board, VoteServer};
use voteboard::lifecycle::{signals, Shutdown};
use voteboard::observability::metrics::Telemetry;
use voteboard::observability::{logging, ops};
use voteboard::store::redis::RedisStore;
use voteboard::store::{self, CounterStore};

#[derive(Parser)]
#[command(name = "voteboard", version, about = "Two-button voting web service")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "voteboard starting");

    let config = match config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(error = %error, "Failed to load configuration");
            exit(2);
        }
    };

    tracing::info!(
        bind_address = %config.server.bind_address,
        button1 = %config.vote.button1,
        button2 = %config.vote.button2,
        store_host = %config.store.host,
        store_port = config.store.port,
        "Configuration loaded"
    );

    let telemetry = match Telemetry::init() {
        Ok(telemetry) => telemetry,
        Err(error) => {
            tracing::error!(error = %error, "Failed to initialize telemetry");
            exit(2);
        }
    };

    let shutdown = Arc::new(Shutdown::new());

    let store: Arc<dyn CounterStore> = match RedisStore::connect(&config.store).await {
        Ok(store) => Arc::new(store),
        Err(error) => {
            tracing::error!(error = %error, "Failed to connect to Redis, terminating.");
            exit(1);
        }
    };

    if let Err(error) =
        store::seed(store.as_ref(), &[&config.vote.button1, &config.vote.button2]).await
    {
        tracing::error!(error = %error, "Failed to seed counters");
        exit(1);
    }

    if config.telemetry.metrics_enabled {
        match TcpListener::bind(&config.telemetry.metrics_address).await {
            Ok(listener) => {
                let ops_state = ops::OpsState {
                    telemetry: telemetry.clone(),
                    store: store.clone(),
                    shutdown: shutdown.clone(),
                };
                let rx = shutdown.subscribe();
                tokio::spawn(async move {
                    if let Err(error) = ops::serve(listener, ops_state, rx).await {
                        tracing::error!(error = %error, "Ops endpoint failed");
                    }
                });
            }
            Err(error) => {
                // The vote surface still works without the ops listener.
                tracing::error!(
                    metrics_address = %config.telemetry.metrics_address,
                    error = %error,
                    "Failed to bind ops endpoint"
                );
            }
        }

        tokio::spawn(telemetry.clone().run_runtime_metrics(
            config.telemetry.runtime_interval_secs,
            shutdown.subscribe(),
        ));
    }

    let board = Board::from_config(&config.vote);
    tracing::info!(title = %board.title, "Board resolved");

    let state = AppState {
        store,
        board: Arc::new(board),
        telemetry,
    };

    let listener = match TcpListener::bind(&config.server.bind_address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(
                bind_address = %config.server.bind_address,
                error = %error,
                "Failed to bind listener"
            );
            exit(1);
        }
    };

    signals::spawn_signal_handler(shutdown.clone());

    let server = VoteServer::new(state);
    if let Err(error) = server.run(listener, shutdown.subscribe()).await {
        tracing::error!(error = %error, "HTTP server failed");
        exit(1);
    }

    tracing::info!("Shutdown complete");
}
