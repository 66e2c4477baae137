//! Observability subsystem: logging, metrics, and the ops endpoint.
//!
//! Logs and spans flow through `tracing`; metrics flow through the
//! `metrics` facade into a Prometheus recorder. Everything a collector
//! needs lives on the ops listener, away from the vote surface.
//!
//! Data flow:
//!
//! ```text
//! handlers/store -> tracing spans + metrics macros
//!                        |
//!                        v
//!               Prometheus recorder -> /metrics (ops listener)
//! ```

pub mod logging;
pub mod metrics;
pub mod ops;
