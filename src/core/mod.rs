//! Core types for the request/response exchange being logged.
//!
//! - [`Request`] - read-only request snapshot
//! - [`Response`] - read-only response snapshot with builder
//! - [`Context`] - storage shared between middleware hooks
//! - [`Error`] - host/pipeline contract violations

mod context;
mod error;
mod request;
mod response;

pub use context::Context;
pub use error::{Error, Result};
pub use request::{Request, UNKNOWN_LENGTH};
pub use response::{Response, ResponseBuilder, UNKNOWN_COUNT};
