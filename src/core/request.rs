//! Read-only request snapshot handed over by the host server.

use std::net::SocketAddr;
use std::time::SystemTime;

use http::header;
use http::{HeaderMap, Method, Uri};

/// Sentinel used by hosts that cannot tell the request content length.
pub const UNKNOWN_LENGTH: i64 = -1;

/// Completed HTTP request as seen by the access log.
///
/// Carries everything the log pipeline reads: method, path, query,
/// headers, declared content length, the instant the request was
/// received and the remote peer address. The body itself is not kept.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    version: http::Version,
    content_length: i64,
    received_at: SystemTime,
    remote_addr: Option<SocketAddr>,
}

impl Request {
    /// Create a new request snapshot received now.
    ///
    /// The content length is taken from the `Content-Length` header,
    /// or [`UNKNOWN_LENGTH`] when the header is missing or unparsable.
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let content_length = headers
            .get(&header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(UNKNOWN_LENGTH);

        Self {
            method,
            uri,
            headers,
            version: http::Version::HTTP_11,
            content_length,
            received_at: SystemTime::now(),
            remote_addr: None,
        }
    }

    /// Set the instant the request was received.
    #[inline]
    pub fn with_received_at(mut self, received_at: SystemTime) -> Self {
        self.received_at = received_at;
        self
    }

    /// Set the remote peer address.
    #[inline]
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Override the declared content length.
    #[inline]
    pub fn with_content_length(mut self, length: i64) -> Self {
        self.content_length = length;
        self
    }

    /// Set the HTTP version.
    #[inline]
    pub fn with_version(mut self, version: http::Version) -> Self {
        self.version = version;
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path without the query string.
    #[inline]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Raw query string, if the URI carried one.
    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn version(&self) -> http::Version {
        self.version
    }

    /// Declared content length, negative when unknown.
    #[inline]
    pub fn content_length(&self) -> i64 {
        self.content_length
    }

    #[inline]
    pub fn received_at(&self) -> SystemTime {
        self.received_at
    }

    #[inline]
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl<B> From<http::Request<B>> for Request {
    fn from(req: http::Request<B>) -> Self {
        let (parts, _body) = req.into_parts();
        Request::new(parts.method, parts.uri, parts.headers).with_version(parts.version)
    }
}
