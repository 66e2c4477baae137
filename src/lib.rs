//! Voting web service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::schema::AppConfig;
pub use http::{AppState, Board, VoteServer};
pub use lifecycle::Shutdown;
pub use observability::metrics::Telemetry;
pub use store::{CounterStore, StoreError};
