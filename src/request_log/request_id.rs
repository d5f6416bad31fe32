//! Defensive parsing of the correlation request id.

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// A request id header that is not a UUID.
#[derive(Debug, Error)]
#[error("unable to parse purported request id '{raw}': {source}")]
pub struct MalformedRequestId {
    pub raw: String,
    #[source]
    pub source: uuid::Error,
}

/// Parse a raw header value, keeping the failure.
///
/// `None` in is `Ok(None)` out.
pub fn try_parse_request_id(raw: Option<&str>) -> Result<Option<Uuid>, MalformedRequestId> {
    match raw {
        None => Ok(None),
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|source| MalformedRequestId {
                raw: raw.to_string(),
                source,
            }),
    }
}

/// Parse a raw header value into a request id.
///
/// Malformed values are reported with a warning and come back as
/// `None`; the failure never reaches the caller.
pub fn parse_request_id(raw: Option<&str>) -> Option<Uuid> {
    match try_parse_request_id(raw) {
        Ok(id) => id,
        Err(err) => {
            warn!(raw = %err.raw, error = %err.source, "Unable to parse purported request id");
            None
        }
    }
}
