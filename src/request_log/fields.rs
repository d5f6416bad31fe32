//! Field extraction from a completed request/response pair.
//!
//! Everything here is a pure function of the two snapshots and one
//! clock read, so extracting twice from the same exchange with the same
//! clock yields identical fields.

use std::sync::LazyLock;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use http::header::{self, HeaderName};
use http::HeaderMap;
use tracing::warn;
use uuid::Uuid;

use super::clock::Clock;
use super::request_id::parse_request_id;
use crate::core::{Request, Response};

/// Header names read by the extractor.
pub mod names {
    use super::*;

    pub static USER_AGENT: HeaderName = header::USER_AGENT;
    pub static ACCEPT_LANGUAGE: HeaderName = header::ACCEPT_LANGUAGE;
    pub static REFERER: HeaderName = header::REFERER;
    pub static HOST: HeaderName = header::HOST;
    pub static ACCEPT: HeaderName = header::ACCEPT;

    pub static X_FORWARDED_FOR: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("x-forwarded-for"));
    pub static X_FORWARDED_PORT: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("x-forwarded-port"));
    pub static X_FORWARDED_PROTO: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("x-forwarded-proto"));

    // Correlation family
    pub static OT_ANONYMOUS_ID: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-anonymousid"));
    pub static OT_REFERRING_HOST: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-referringhost"));
    pub static OT_REFERRING_SERVICE: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-referringservice"));
    pub static OT_SESSION_ID: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-sessionid"));
    pub static OT_USER_ID: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-userid"));
    pub static OT_DOMAIN: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-domain"));
    pub static OT_ORIGINAL_URI: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-originaluri"));

    /// Response-side request id used for cross-service correlation.
    pub static OT_REQUEST_ID: LazyLock<HeaderName> =
        LazyLock::new(|| HeaderName::from_static("ot-requestid"));
}

/// Normalized per-exchange values, before service metadata and event
/// identity are attached.
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeFields {
    pub timestamp: DateTime<Utc>,
    pub method: String,
    pub url: String,
    pub url_querystring: Option<String>,
    pub status: u16,
    pub duration_micros: u64,
    pub body_size: Option<u64>,
    pub response_size: Option<u64>,
    pub request_id: Option<Uuid>,

    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub referring_host: Option<String>,
    pub referring_service: Option<String>,
    pub domain: Option<String>,
    pub anonymous_id: Option<String>,

    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub referer: Option<String>,
    pub remote_address: Option<String>,

    pub header_ot_originaluri: Option<String>,
    pub header_host: Option<String>,
    pub header_accept: Option<String>,
    pub header_x_forwarded_for: Option<String>,
    pub header_x_forwarded_port: Option<String>,
    pub header_x_forwarded_proto: Option<String>,
}

/// Pull every field out of one exchange, reading the clock once.
pub fn extract(req: &Request, res: &Response, clock: &dyn Clock) -> ExchangeFields {
    let started = req.received_at();
    let headers = req.headers();

    ExchangeFields {
        timestamp: DateTime::<Utc>::from(started),
        method: req.method().as_str().to_string(),
        url: full_url(req.path(), req.query()),
        url_querystring: req.query().filter(|q| !q.is_empty()).map(str::to_string),
        status: res.status().as_u16(),
        duration_micros: duration_micros(started, clock.now()),
        body_size: body_size(req.content_length()),
        response_size: response_size(res.content_count()),
        request_id: parse_request_id(res.header(names::OT_REQUEST_ID.as_str())),

        user_id: header_value(headers, &names::OT_USER_ID),
        session_id: header_value(headers, &names::OT_SESSION_ID),
        referring_host: header_value(headers, &names::OT_REFERRING_HOST),
        referring_service: header_value(headers, &names::OT_REFERRING_SERVICE),
        domain: header_value(headers, &names::OT_DOMAIN),
        anonymous_id: header_value(headers, &names::OT_ANONYMOUS_ID),

        user_agent: header_value(headers, &names::USER_AGENT),
        accept_language: header_value(headers, &names::ACCEPT_LANGUAGE),
        referer: header_value(headers, &names::REFERER),
        remote_address: req.remote_addr().map(|addr| addr.ip().to_string()),

        header_ot_originaluri: header_value(headers, &names::OT_ORIGINAL_URI),
        header_host: header_value(headers, &names::HOST),
        header_accept: header_value(headers, &names::ACCEPT),
        header_x_forwarded_for: header_value(headers, &names::X_FORWARDED_FOR),
        header_x_forwarded_port: header_value(headers, &names::X_FORWARDED_PORT),
        header_x_forwarded_proto: header_value(headers, &names::X_FORWARDED_PROTO),
    }
}

/// `path?query`, or `path` alone when the query is absent or empty.
pub fn full_url(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => {
            let mut url = String::with_capacity(path.len() + 1 + q.len());
            url.push_str(path);
            url.push('?');
            url.push_str(q);
            url
        }
        _ => path.to_string(),
    }
}

/// Request body size, present only when strictly positive.
#[inline]
pub fn body_size(content_length: i64) -> Option<u64> {
    u64::try_from(content_length).ok().filter(|&n| n > 0)
}

/// Response size; a negative count means unknown.
#[inline]
pub fn response_size(content_count: i64) -> Option<u64> {
    u64::try_from(content_count).ok()
}

/// Elapsed microseconds between `start` and `now`.
///
/// A wall clock stepped back behind `start` yields 0, with a warning.
pub fn duration_micros(start: SystemTime, now: SystemTime) -> u64 {
    match now.duration_since(start) {
        Ok(elapsed) => u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        Err(err) => {
            warn!(
                start = %DateTime::<Utc>::from(start).to_rfc3339(),
                now = %DateTime::<Utc>::from(now).to_rfc3339(),
                behind_micros = err.duration().as_micros() as u64,
                "Clock is behind request start, clamping duration to zero"
            );
            0
        }
    }
}

/// First value of a header, verbatim. Non-UTF-8 bytes are replaced.
#[inline]
fn header_value(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}
