//! Emission sinks: where finished events go.
//!
//! A sink takes ownership of the event and must not fail back into the
//! pipeline. Transport problems are the sink's own business: it can
//! buffer, retry, or drop and count.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use super::event::{HttpLogFields, RequestLogEvent};
use crate::observability::Metrics;

/// `tracing` target used for emitted access events.
pub const ACCESS_TARGET: &str = "access";

/// Consumer of assembled events.
pub trait EmissionSink: Send + Sync {
    fn emit(&self, event: RequestLogEvent);
}

impl<S: EmissionSink + ?Sized> EmissionSink for Arc<S> {
    fn emit(&self, event: RequestLogEvent) {
        (**self).emit(event)
    }
}

/// Emits each event as a structured `tracing` event at INFO level with
/// target `access`; the installed subscriber decides the wire format.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EmissionSink for TracingSink {
    fn emit(&self, event: RequestLogEvent) {
        let request_id = event.request_id().map(|id| id.to_string());

        info!(
            target: ACCESS_TARGET,
            log_name = event.log_name(),
            service_type = event.service_type(),
            event_id = %event.event_id(),
            timestamp = %event.timestamp_iso(),
            method = event.method(),
            url = event.url(),
            url_querystring = event.url_querystring(),
            status = event.status(),
            incoming = event.incoming(),
            duration_micros = event.duration_micros(),
            body_size = event.body_size(),
            response_size = event.response_size(),
            request_id = request_id.as_deref(),
            user_id = event.user_id(),
            session_id = event.session_id(),
            referring_host = event.referring_host(),
            referring_service = event.referring_service(),
            domain = event.domain(),
            anonymous_id = event.anonymous_id(),
            user_agent = event.user_agent(),
            accept_language = event.accept_language(),
            referer = event.referer(),
            remote_address = event.remote_address(),
            header_ot_originaluri = event.header_ot_originaluri(),
            header_host = event.header_host(),
            header_accept = event.header_accept(),
            header_x_forwarded_for = event.header_x_forwarded_for(),
            header_x_forwarded_port = event.header_x_forwarded_port(),
            header_x_forwarded_proto = event.header_x_forwarded_proto(),
            "{}",
            event.message()
        );
    }
}

/// Writes one JSON object per line.
pub struct JsonLineSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl JsonLineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonLineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> EmissionSink for JsonLineSink<W> {
    fn emit(&self, event: RequestLogEvent) {
        let mut line = match serde_json::to_vec(&event) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, event_id = %event.event_id(), "Failed to serialize request log event");
                return;
            }
        };
        line.push(b'\n');

        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writer.write_all(&line).and_then(|_| writer.flush()) {
            warn!(error = %e, "Failed to write request log event");
        }
    }
}

/// Hands events to a bounded queue without ever blocking.
///
/// A full or closed queue drops the event and counts it.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<RequestLogEvent>,
    metrics: Option<Arc<Metrics>>,
}

impl ChannelSink {
    /// Create the sink and the receiving end of its queue.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<RequestLogEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx, metrics: None }, rx)
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn dropped(&self, reason: &str, event: &RequestLogEvent) {
        debug!(reason, event_id = %event.event_id(), "Dropping request log event");
        if let Some(ref metrics) = self.metrics {
            metrics.record_dropped(reason);
        }
    }
}

impl EmissionSink for ChannelSink {
    fn emit(&self, event: RequestLogEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => self.dropped("full", &event),
            Err(TrySendError::Closed(event)) => self.dropped("closed", &event),
        }
    }
}

/// Forward everything from a [`ChannelSink`] queue into another sink
/// until every sender is gone.
pub async fn drain_into<S: EmissionSink>(mut rx: mpsc::Receiver<RequestLogEvent>, sink: S) {
    while let Some(event) = rx.recv().await {
        sink.emit(event);
    }
    debug!("Request log queue closed");
}
