//! request_log - structured access logging for HTTP servers.
//!
//! Every completed request/response exchange becomes one immutable
//! [`RequestLogEvent`](request_log::RequestLogEvent) handed to an
//! emission sink, unless its path is blacklisted.
//!
//! # Features
//!
//! - **Blacklist**: prefix and exact path rules, case-insensitive
//! - **Structured events**: typed fields, absent values omitted, ISO-8601 timestamps
//! - **Correlation**: `OT-RequestId` parsed defensively, re-established in the
//!   diagnostic context while the sink runs
//! - **Sinks**: `tracing`, JSON lines, bounded non-blocking queue
//! - **Metrics**: Prometheus counters for emitted, blacklisted and dropped events
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use request_log::middleware::{MiddlewareChain, RequestLogMiddleware};
//! use request_log::request_log::{Blacklist, RequestLog, TracingSink};
//!
//! let log = RequestLog::builder()
//!     .blacklist(Blacklist::new(["/static/"], ["/health"]))
//!     .sink(TracingSink)
//!     .build();
//!
//! let chain = MiddlewareChain::new().with(RequestLogMiddleware::new(Arc::new(log)));
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod core;
pub mod logging;
pub mod middleware;
pub mod observability;
pub mod request_log;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use request_log::{RequestLog, RequestLogEvent};
