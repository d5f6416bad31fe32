//! Structured access logging for completed HTTP exchanges.
//!
//! One call to [`RequestLog::log`] per finished request runs the whole
//! pipeline synchronously:
//!
//! 1. the [`Blacklist`] decides whether the path is logged at all
//! 2. [`fields::extract`] reads every field from the request/response pair
//! 3. [`RequestLogEvent::assemble`] builds the immutable event and message
//! 4. the correlation id is put into the diagnostic context ([`mdc`])
//! 5. the [`EmissionSink`] receives the event, then the context is cleared
//!
//! ```rust,ignore
//! use request_log::request_log::{Blacklist, RequestLog, TracingSink};
//!
//! let log = RequestLog::builder()
//!     .blacklist(Blacklist::new(["/static/"], ["/health"]))
//!     .sink(TracingSink)
//!     .build();
//!
//! log.log(&request, &response);
//! ```

pub mod blacklist;
pub mod clock;
pub mod event;
pub mod fields;
pub mod mdc;
pub mod message;
pub mod request_id;
pub mod sink;

use std::sync::Arc;

use tracing::info_span;

use crate::config::ServiceInfo;
use crate::core::{Request, Response};
use crate::observability::Metrics;

pub use blacklist::Blacklist;
pub use clock::{Clock, FixedClock, SystemClock};
pub use event::{HttpLogFields, RequestLogEvent, LOG_NAME};
pub use fields::ExchangeFields;
pub use mdc::REQUEST_ID_KEY;
pub use message::construct_message;
pub use request_id::{parse_request_id, try_parse_request_id, MalformedRequestId};
pub use sink::{drain_into, ChannelSink, EmissionSink, JsonLineSink, TracingSink};

/// What happened to one completed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogOutcome {
    /// The path matched the blacklist; nothing was built or emitted.
    Blacklisted,
    /// An event was handed to the sink.
    Emitted,
}

/// Build the event for one exchange without filtering or emitting it.
pub fn build_event(
    req: &Request,
    res: &Response,
    clock: &dyn Clock,
    service: &ServiceInfo,
) -> RequestLogEvent {
    RequestLogEvent::assemble(fields::extract(req, res, clock), service)
}

/// The access log pipeline.
///
/// Immutable after construction and cheap to share: wrap it in an `Arc`
/// and call [`log`](Self::log) from any number of threads.
pub struct RequestLog {
    blacklist: Blacklist,
    service: ServiceInfo,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn EmissionSink>,
    metrics: Option<Arc<Metrics>>,
}

impl RequestLog {
    pub fn builder() -> RequestLogBuilder {
        RequestLogBuilder::default()
    }

    /// Run the pipeline for one completed exchange.
    pub fn log(&self, req: &Request, res: &Response) -> LogOutcome {
        if !self.blacklist.should_log(req.path()) {
            if let Some(ref metrics) = self.metrics {
                metrics.events_blacklisted_total.inc();
            }
            return LogOutcome::Blacklisted;
        }

        let event = self.create_event(req, res);
        self.emit(event);
        LogOutcome::Emitted
    }

    /// Build the event for an exchange, ignoring the blacklist.
    pub fn create_event(&self, req: &Request, res: &Response) -> RequestLogEvent {
        let event = build_event(req, res, self.clock.as_ref(), &self.service);

        if let Some(ref metrics) = self.metrics {
            let header_sent = res.header(fields::names::OT_REQUEST_ID.as_str()).is_some();
            if header_sent && event.request_id().is_none() {
                metrics.malformed_request_ids_total.inc();
            }
        }

        event
    }

    /// Hand an event to the sink with its correlation id in context.
    ///
    /// The id is visible through [`mdc::get`] and as the `request_id`
    /// field of the current span only while the sink runs.
    pub fn emit(&self, event: RequestLogEvent) {
        let correlation_id = event.correlation_id().to_string();
        let span = info_span!("request_log", request_id = %correlation_id);
        let _entered = span.enter();
        let _mdc = mdc::scoped(REQUEST_ID_KEY, correlation_id);

        self.sink.emit(event);

        if let Some(ref metrics) = self.metrics {
            metrics.events_emitted_total.inc();
        }
    }
}

impl std::fmt::Debug for RequestLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLog")
            .field("blacklist", &self.blacklist)
            .field("service", &self.service)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`RequestLog`].
///
/// Defaults: empty blacklist, no service type, system clock,
/// [`TracingSink`], no metrics.
#[derive(Default)]
pub struct RequestLogBuilder {
    blacklist: Option<Blacklist>,
    service: Option<ServiceInfo>,
    clock: Option<Arc<dyn Clock>>,
    sink: Option<Arc<dyn EmissionSink>>,
    metrics: Option<Arc<Metrics>>,
}

impl RequestLogBuilder {
    pub fn blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = Some(blacklist);
        self
    }

    pub fn service(mut self, service: ServiceInfo) -> Self {
        self.service = Some(service);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn sink(mut self, sink: impl EmissionSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    pub fn shared_sink(mut self, sink: Arc<dyn EmissionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> RequestLog {
        RequestLog {
            blacklist: self.blacklist.unwrap_or_else(Blacklist::empty),
            service: self.service.unwrap_or_default(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
            metrics: self.metrics,
        }
    }
}
