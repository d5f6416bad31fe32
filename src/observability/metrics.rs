//! Prometheus metrics for the request log pipeline.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

/// Counters describing what happened to completed requests.
pub struct Metrics {
    registry: Registry,

    /// Events handed to a sink
    pub events_emitted_total: IntCounter,

    /// Requests skipped by the blacklist
    pub events_blacklisted_total: IntCounter,

    /// Events a sink had to drop, by reason
    pub events_dropped_total: IntCounterVec,

    /// Request id headers that were not UUIDs
    pub malformed_request_ids_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let events_emitted_total = IntCounter::new(
            "request_log_events_emitted_total",
            "Request log events handed to the sink",
        )?;
        registry.register(Box::new(events_emitted_total.clone()))?;

        let events_blacklisted_total = IntCounter::new(
            "request_log_events_blacklisted_total",
            "Requests not logged because their path is blacklisted",
        )?;
        registry.register(Box::new(events_blacklisted_total.clone()))?;

        let events_dropped_total = IntCounterVec::new(
            Opts::new(
                "request_log_events_dropped_total",
                "Request log events dropped by the sink",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(events_dropped_total.clone()))?;

        let malformed_request_ids_total = IntCounter::new(
            "request_log_malformed_request_ids_total",
            "Response request id headers that failed to parse",
        )?;
        registry.register(Box::new(malformed_request_ids_total.clone()))?;

        Ok(Self {
            registry,
            events_emitted_total,
            events_blacklisted_total,
            events_dropped_total,
            malformed_request_ids_total,
        })
    }

    #[inline]
    pub fn record_dropped(&self, reason: &str) {
        self.events_dropped_total.with_label_values(&[reason]).inc();
    }

    /// Render all metrics in the Prometheus text format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            warn!(error = %e, "Failed to encode metrics");
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
