//! Metrics collection and the shared telemetry handle.
//!
//! # Responsibilities
//! - Install the Prometheus recorder and describe every series up front
//! - Provide the [`Telemetry`] handle carried through application state
//! - Record request, vote, and counter-store metrics at the call sites
//! - Keep runtime gauges fresh on a background interval
//!
//! # Series
//! - `voteboard_requests_total` (counter): handled requests by method and status
//! - `voteboard_request_duration_seconds` (histogram): latency by method
//! - `voteboard_votes_total` (counter): vote increments by button
//! - `voteboard_resets_total` (counter): reset actions
//! - `voteboard_store_ops_total` (counter): store round trips by op and outcome
//! - `voteboard_uptime_seconds` (gauge): seconds since telemetry came up

use std::time::{Duration, Instant};

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use tokio::sync::broadcast;
use tracing::Span;

/// Histogram buckets sized for a page that does two or three store round
/// trips per request.
const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5,
];

/// Handle to the process-wide telemetry pipeline.
///
/// Created once during bootstrap and cloned into every scope that emits
/// spans or serves the exposition endpoint. The recorder itself is global;
/// the handle exists so rendering and uptime never reach for statics.
#[derive(Clone)]
pub struct Telemetry {
    prometheus: PrometheusHandle,
    started_at: Instant,
}

impl Telemetry {
    /// Install the metrics recorder and register every series.
    ///
    /// Fails if a recorder is already installed in this process.
    pub fn init() -> Result<Self, BuildError> {
        let prometheus = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full("voteboard_request_duration_seconds".to_string()),
                DURATION_BUCKETS,
            )?
            .install_recorder()?;

        describe_counter!(
            "voteboard_requests_total",
            Unit::Count,
            "Handled HTTP requests by method and status"
        );
        describe_histogram!(
            "voteboard_request_duration_seconds",
            Unit::Seconds,
            "Request latency by method"
        );
        describe_counter!(
            "voteboard_votes_total",
            Unit::Count,
            "Vote increments by button"
        );
        describe_counter!("voteboard_resets_total", Unit::Count, "Reset actions");
        describe_counter!(
            "voteboard_store_ops_total",
            Unit::Count,
            "Counter store round trips by op and outcome"
        );
        describe_gauge!(
            "voteboard_uptime_seconds",
            Unit::Seconds,
            "Seconds since the telemetry pipeline started"
        );

        Ok(Self {
            prometheus,
            started_at: Instant::now(),
        })
    }

    /// Render every series in Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.prometheus.render()
    }

    /// Time elapsed since the pipeline came up.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Span emitted around each tally read. The name is static so the
    /// backend can aggregate; the button rides along as a field.
    pub fn tally_span(&self, button: &str) -> Span {
        tracing::info_span!("tally", button = %button)
    }

    /// Keep runtime gauges fresh until shutdown. Runs as its own task;
    /// nothing on the vote path waits for it.
    pub async fn run_runtime_metrics(
        self,
        interval_secs: u64,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    gauge!("voteboard_uptime_seconds").set(self.uptime().as_secs_f64());
                    self.prometheus.run_upkeep();
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Runtime metrics task stopping");
                    break;
                }
            }
        }
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, started: Instant) {
    counter!(
        "voteboard_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "voteboard_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}

/// Record one vote increment.
pub fn record_vote(button: &str) {
    counter!("voteboard_votes_total", "button" => button.to_string()).increment(1);
}

/// Record one reset of both tallies.
pub fn record_reset() {
    counter!("voteboard_resets_total").increment(1);
}

/// Record one counter store round trip.
pub fn record_store_op(op: &'static str, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("voteboard_store_ops_total", "op" => op, "outcome" => outcome).increment(1);
}
