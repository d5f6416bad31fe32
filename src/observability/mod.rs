//! Observability for the logging pipeline itself.
//!
//! ```rust,ignore
//! use request_log::observability::Metrics;
//!
//! let metrics = Metrics::new()?;
//! metrics.events_emitted_total.inc();
//! println!("{}", metrics.export());
//! ```

pub mod metrics;

pub use metrics::Metrics;
