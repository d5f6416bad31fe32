//! The structured request log event.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use super::fields::ExchangeFields;
use super::message::construct_message;
use crate::config::ServiceInfo;

/// Value of `logName` for every event of this kind.
pub const LOG_NAME: &str = "request";

/// Named read access to the fields of an HTTP log record.
///
/// Sinks and formatters go through this rather than the concrete type,
/// so other record shapes can be plugged in behind the same names.
pub trait HttpLogFields {
    fn log_name(&self) -> &str;
    fn service_type(&self) -> Option<&str>;
    fn event_id(&self) -> Uuid;
    fn timestamp(&self) -> DateTime<Utc>;
    fn method(&self) -> &str;
    fn url(&self) -> &str;
    fn url_querystring(&self) -> Option<&str>;
    fn status(&self) -> u16;
    fn incoming(&self) -> bool;
    fn duration_micros(&self) -> u64;
    fn body_size(&self) -> Option<u64>;
    fn response_size(&self) -> Option<u64>;
    fn request_id(&self) -> Option<Uuid>;
    fn user_id(&self) -> Option<&str>;
    fn session_id(&self) -> Option<&str>;
    fn referring_host(&self) -> Option<&str>;
    fn referring_service(&self) -> Option<&str>;
    fn domain(&self) -> Option<&str>;
    fn anonymous_id(&self) -> Option<&str>;
    fn user_agent(&self) -> Option<&str>;
    fn accept_language(&self) -> Option<&str>;
    fn referer(&self) -> Option<&str>;
    fn remote_address(&self) -> Option<&str>;
    fn header_ot_originaluri(&self) -> Option<&str>;
    fn header_host(&self) -> Option<&str>;
    fn header_accept(&self) -> Option<&str>;
    fn header_x_forwarded_for(&self) -> Option<&str>;
    fn header_x_forwarded_port(&self) -> Option<&str>;
    fn header_x_forwarded_proto(&self) -> Option<&str>;

    /// Human-readable one-line summary.
    fn message(&self) -> &str;
}

/// One completed incoming HTTP exchange.
///
/// Built once by [`RequestLogEvent::assemble`] and immutable from then
/// on; the summary message is derived from the built fields so the two
/// can never disagree.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogEvent {
    log_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_type: Option<String>,
    event_id: Uuid,
    #[serde(serialize_with = "serialize_instant")]
    timestamp: DateTime<Utc>,
    message: String,

    method: String,
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url_querystring: Option<String>,
    status: u16,
    incoming: bool,
    duration_micros: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    body_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referring_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referring_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    anonymous_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    accept_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    referer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    header_ot_originaluri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_accept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_x_forwarded_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_x_forwarded_port: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_x_forwarded_proto: Option<String>,
}

impl RequestLogEvent {
    /// Build the event from extracted fields and service metadata.
    ///
    /// A fresh event id is generated here; it is unrelated to the
    /// correlation `request_id` read from the response.
    pub fn assemble(fields: ExchangeFields, service: &ServiceInfo) -> Self {
        let mut event = Self {
            log_name: LOG_NAME,
            service_type: service.service_type.clone(),
            event_id: Uuid::new_v4(),
            timestamp: fields.timestamp,
            message: String::new(),

            method: fields.method,
            url: fields.url,
            url_querystring: fields.url_querystring,
            status: fields.status,
            incoming: true,
            duration_micros: fields.duration_micros,
            body_size: fields.body_size,
            response_size: fields.response_size,
            request_id: fields.request_id,

            user_id: fields.user_id,
            session_id: fields.session_id,
            referring_host: fields.referring_host,
            referring_service: fields.referring_service,
            domain: fields.domain,
            anonymous_id: fields.anonymous_id,
            user_agent: fields.user_agent,
            accept_language: fields.accept_language,
            referer: fields.referer,
            remote_address: fields.remote_address,

            header_ot_originaluri: fields.header_ot_originaluri,
            header_host: fields.header_host,
            header_accept: fields.header_accept,
            header_x_forwarded_for: fields.header_x_forwarded_for,
            header_x_forwarded_port: fields.header_x_forwarded_port,
            header_x_forwarded_proto: fields.header_x_forwarded_proto,
        };
        event.message = construct_message(&event);
        event
    }

    /// Correlation key for the diagnostic context: the request id when
    /// the response carried one, the event id otherwise.
    pub fn correlation_id(&self) -> Uuid {
        self.request_id.unwrap_or(self.event_id)
    }

    /// Timestamp as an ISO-8601 instant, e.g. `2023-11-14T22:13:20.123Z`.
    pub fn timestamp_iso(&self) -> String {
        format_instant(&self.timestamp)
    }
}

impl HttpLogFields for RequestLogEvent {
    fn log_name(&self) -> &str {
        self.log_name
    }

    fn service_type(&self) -> Option<&str> {
        self.service_type.as_deref()
    }

    fn event_id(&self) -> Uuid {
        self.event_id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn method(&self) -> &str {
        &self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn url_querystring(&self) -> Option<&str> {
        self.url_querystring.as_deref()
    }

    fn status(&self) -> u16 {
        self.status
    }

    fn incoming(&self) -> bool {
        self.incoming
    }

    fn duration_micros(&self) -> u64 {
        self.duration_micros
    }

    fn body_size(&self) -> Option<u64> {
        self.body_size
    }

    fn response_size(&self) -> Option<u64> {
        self.response_size
    }

    fn request_id(&self) -> Option<Uuid> {
        self.request_id
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    fn referring_host(&self) -> Option<&str> {
        self.referring_host.as_deref()
    }

    fn referring_service(&self) -> Option<&str> {
        self.referring_service.as_deref()
    }

    fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    fn anonymous_id(&self) -> Option<&str> {
        self.anonymous_id.as_deref()
    }

    fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    fn accept_language(&self) -> Option<&str> {
        self.accept_language.as_deref()
    }

    fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    fn remote_address(&self) -> Option<&str> {
        self.remote_address.as_deref()
    }

    fn header_ot_originaluri(&self) -> Option<&str> {
        self.header_ot_originaluri.as_deref()
    }

    fn header_host(&self) -> Option<&str> {
        self.header_host.as_deref()
    }

    fn header_accept(&self) -> Option<&str> {
        self.header_accept.as_deref()
    }

    fn header_x_forwarded_for(&self) -> Option<&str> {
        self.header_x_forwarded_for.as_deref()
    }

    fn header_x_forwarded_port(&self) -> Option<&str> {
        self.header_x_forwarded_port.as_deref()
    }

    fn header_x_forwarded_proto(&self) -> Option<&str> {
        self.header_x_forwarded_proto.as_deref()
    }

    fn message(&self) -> &str {
        &self.message
    }
}

fn format_instant(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_instant<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_instant(ts))
}
