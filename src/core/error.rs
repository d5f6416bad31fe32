//! Core error types.

use thiserror::Error;

/// Contract violations between the host and the log pipeline.
///
/// These indicate a caller defect. They fail the logging call and are
/// never turned into an HTTP error.
#[derive(Debug, Error)]
pub enum Error {
    /// The request snapshot recorded at request time is gone.
    #[error("missing request snapshot for {0}")]
    MissingRequest(&'static str),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
