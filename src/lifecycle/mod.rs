//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init telemetry → Connect store → Start listeners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then telemetry, then the store, then
//!   listeners; a store that cannot be reached aborts the process
//! - Ordered shutdown: readiness flips to draining, listeners finish
//!   in-flight requests, background tasks stop

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
