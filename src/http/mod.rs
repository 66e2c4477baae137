//! HTTP subsystem: the public voting surface.
//!
//! Data flow:
//!
//! ```text
//! GET /  -> handlers::index -> store reads  -> page::render
//! POST / -> handlers::vote  -> store writes -> store reads -> page::render
//! ```
//!
//! Middleware order (outermost first): request ID, trace, propagate ID,
//! request metrics, then the handler.

pub mod handlers;
pub mod page;
pub mod server;

pub use server::{AppState, Board, VoteServer};
