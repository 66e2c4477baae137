//! Request handlers for the voting surface.
//!
//! # Responsibilities
//! - GET /: read both tallies and render the page
//! - POST /: apply the submitted action, re-read, render
//! - Map store failures to 500 responses
//!
//! # Design Decisions
//! - Every mutation re-reads the counters before rendering, so the page
//!   always shows store truth rather than a locally computed value
//! - The form value is used as the store key verbatim; "reset" is the
//!   only value with special meaning

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use crate::http::page::{self, Tallies};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{self, StoreError};

/// Form value that zeroes both tallies instead of incrementing.
const RESET_ACTION: &str = "reset";

/// Form payload for POST /.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub vote: String,
}

/// Failure raised while handling a vote request.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    #[error("counter store failure: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for VoteError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}

/// GET /: render the current tallies.
///
/// Each read gets its own span with the button label attached, and the
/// value is logged inside that span once the read completes.
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, VoteError> {
    let value1 = store::read_tally(state.store.as_ref(), &state.board.button1).await?;
    {
        let span = state.telemetry.tally_span(&state.board.button1);
        let _guard = span.enter();
        tracing::info!(tally = value1, "Tally read");
    }

    let value2 = store::read_tally(state.store.as_ref(), &state.board.button2).await?;
    {
        let span = state.telemetry.tally_span(&state.board.button2);
        let _guard = span.enter();
        tracing::info!(tally = value2, "Tally read");
    }

    Ok(Html(page::render(
        &state.board,
        Tallies { value1, value2 },
    )))
}

/// POST /: apply the vote or reset action and render the refreshed page.
pub async fn vote(
    State(state): State<AppState>,
    Form(form): Form<VoteForm>,
) -> Result<Html<String>, VoteError> {
    if form.vote == RESET_ACTION {
        state.store.set(&state.board.button1, 0).await?;
        state.store.set(&state.board.button2, 0).await?;
        metrics::record_reset();

        let (value1, value2) = read_pair(&state).await?;
        tracing::info!(button = %state.board.button1, tally = value1, "Tally reset");
        tracing::info!(button = %state.board.button2, tally = value2, "Tally reset");

        return Ok(Html(page::render(
            &state.board,
            Tallies { value1, value2 },
        )));
    }

    let total = state.store.incr(&form.vote, 1).await?;
    metrics::record_vote(&form.vote);
    tracing::info!(button = %form.vote, tally = total, "Vote recorded");

    let (value1, value2) = read_pair(&state).await?;
    tracing::info!(
        button1 = %state.board.button1,
        tally1 = value1,
        button2 = %state.board.button2,
        tally2 = value2,
        "Tallies refreshed"
    );

    Ok(Html(page::render(
        &state.board,
        Tallies { value1, value2 },
    )))
}

async fn read_pair(state: &AppState) -> Result<(i64, i64), VoteError> {
    let value1 = store::read_tally(state.store.as_ref(), &state.board.button1).await?;
    let value2 = store::read_tally(state.store.as_ref(), &state.board.button2).await?;
    Ok((value1, value2))
}
