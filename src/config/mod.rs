//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → voteboard.toml (optional TOML layer)
//!     → environment (VOTE1VALUE, VOTE2VALUE, TITLE, SHOWHOST,
//!       REDIS, REDIS_PWD, METRICS_ADDR)
//!     → validation.rs (semantic checks)
//!     → AppConfig (fixed struct, immutable after bootstrap)
//! ```
//!
//! # Design Decisions
//! - Every field has a default so any layer may be partial or absent
//! - Environment wins over file, file wins over defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError, DEFAULT_CONFIG_PATH};
pub use schema::{AppConfig, ServerConfig, StoreConfig, TelemetryConfig, VoteConfig};
