//! Structured logging for the voting service.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber once at process start
//! - Filter output via `RUST_LOG`, defaulting to app-level info
//! - Switch between human-readable and JSON output via `LOG_FORMAT`
//!
//! # Design Decisions
//! - Uses `tracing-subscriber` with an `EnvFilter` so operators can raise
//!   verbosity per module without a rebuild
//! - JSON output is opt-in; local development keeps the pretty formatter

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "voteboard=info,tower_http=info";

/// Install the global subscriber. Call exactly once, before any other
/// subsystem logs.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
