//! Read-only response snapshot handed over by the host server.

use bytes::Bytes;
use http::header::HeaderName;
use http::{HeaderMap, HeaderValue, StatusCode};

/// Sentinel for "bytes written is unknown", e.g. an aborted stream.
pub const UNKNOWN_COUNT: i64 = -1;

/// HTTP response as it left the server.
///
/// `content_count` is the number of body bytes actually written, or
/// [`UNKNOWN_COUNT`] when the host could not account for them.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    content_count: i64,
}

impl Response {
    /// Create a new response builder.
    #[inline]
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::new()
    }

    /// Create a 200 OK response with body.
    #[inline]
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::builder().body(body).build()
    }

    /// Create an empty response with given status.
    #[inline]
    pub fn empty(status: StatusCode) -> Self {
        Self::builder().status(status).build()
    }

    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body bytes written, negative when unknown.
    #[inline]
    pub fn content_count(&self) -> i64 {
        self.content_count
    }

    /// Get a header value by string name (case-insensitive).
    #[inline]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Add a header by string name and value. Invalid pairs are ignored.
    #[inline]
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Override the number of bytes written.
    #[inline]
    pub fn with_content_count(mut self, count: i64) -> Self {
        self.content_count = count;
        self
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<Response> for http::Response<Bytes> {
    fn from(res: Response) -> Self {
        let mut out = http::Response::new(res.body);
        *out.status_mut() = res.status;
        *out.headers_mut() = res.headers;
        out
    }
}

/// Builder for creating responses.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Option<HeaderMap>,
    body: Bytes,
    content_count: Option<i64>,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: None,
            body: Bytes::new(),
            content_count: None,
        }
    }

    #[inline]
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Add header by strings. Invalid pairs are ignored.
    #[inline]
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers
                .get_or_insert_with(HeaderMap::new)
                .insert(name, value);
        }
        self
    }

    #[inline]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Bytes written; defaults to the body length.
    #[inline]
    pub fn content_count(mut self, count: i64) -> Self {
        self.content_count = Some(count);
        self
    }

    #[inline]
    pub fn build(self) -> Response {
        let content_count = self
            .content_count
            .unwrap_or_else(|| i64::try_from(self.body.len()).unwrap_or(i64::MAX));
        Response {
            status: self.status,
            headers: self.headers.unwrap_or_default(),
            body: self.body,
            content_count,
        }
    }
}
