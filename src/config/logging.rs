//! Logging configuration.

use std::str::FromStr;

use super::parse::Vars;
use super::ConfigError;

const DEFAULT_FILTER: &str = "request_log=info,access=info";

/// Output format of the log subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output for local development.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(format!("unknown format '{}', expected: json, pretty", other)),
        }
    }
}

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Log level filter (from LOG_LEVEL or RUST_LOG).
    pub filter: String,
    pub format: LogFormat,
    /// Service name for structured logging.
    pub service_name: String,
}

impl LoggingConfig {
    /// Priority: LOG_LEVEL > RUST_LOG > default
    ///
    /// LOG_LEVEL accepts simple values: trace, debug, info, warn, error
    /// RUST_LOG accepts full tracing filter syntax: request_log=debug,hyper=warn
    pub(crate) fn from_vars(vars: &Vars) -> Result<Self, ConfigError> {
        let format = match vars.opt("LOG_FORMAT") {
            Some(raw) => raw
                .parse::<LogFormat>()
                .map_err(|message| ConfigError::Invalid {
                    key: "LOG_FORMAT".into(),
                    message,
                })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            filter: Self::resolve_log_filter(vars),
            format,
            service_name: vars.or("SERVICE_NAME", "request_log"),
        })
    }

    fn resolve_log_filter(vars: &Vars) -> String {
        // 1. LOG_LEVEL (simple: debug, info, warn, error)
        if let Some(level) = vars.opt("LOG_LEVEL") {
            let level = level.to_lowercase();
            match level.as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => {
                    // Access events stay on whatever the crate level is
                    return format!("request_log={},access=info", level);
                }
                _ => {
                    // Subscriber is not up yet
                    eprintln!(
                        "Warning: Invalid LOG_LEVEL '{}', expected: trace, debug, info, warn, error",
                        level
                    );
                }
            }
        }

        // 2. RUST_LOG (full tracing filter syntax)
        if let Some(filter) = vars.opt("RUST_LOG") {
            return filter;
        }

        DEFAULT_FILTER.to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::default(),
            service_name: "request_log".to_string(),
        }
    }
}
