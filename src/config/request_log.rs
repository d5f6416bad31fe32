//! Request log configuration.

use std::num::NonZeroUsize;
use std::str::FromStr;

use super::parse::Vars;
use super::ConfigError;
use crate::request_log::Blacklist;

const DEFAULT_CHANNEL_CAPACITY: usize = 10_000;

/// Where events are sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SinkKind {
    /// Structured `tracing` events with target `access`.
    #[default]
    Tracing,
    /// One JSON object per line on stdout.
    Stdout,
    /// Bounded queue drained by a background task.
    Channel,
}

impl FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tracing" => Ok(Self::Tracing),
            "stdout" => Ok(Self::Stdout),
            "channel" => Ok(Self::Channel),
            other => Err(format!(
                "unknown sink '{}', expected: tracing, stdout, channel",
                other
            )),
        }
    }
}

/// Request log configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct RequestLogConfig {
    /// Request logging enabled.
    pub enabled: bool,
    /// Path prefixes that are never logged.
    pub starts_with_blacklist: Vec<String>,
    /// Exact paths that are never logged.
    pub equality_blacklist: Vec<String>,
    pub sink: SinkKind,
    channel_capacity: NonZeroUsize,
}

impl RequestLogConfig {
    pub(crate) fn from_vars(vars: &Vars) -> Result<Self, ConfigError> {
        let sink = match vars.opt("REQUEST_LOG_SINK") {
            Some(raw) => raw
                .parse::<SinkKind>()
                .map_err(|message| ConfigError::Invalid {
                    key: "REQUEST_LOG_SINK".into(),
                    message,
                })?,
            None => SinkKind::default(),
        };

        let capacity: usize = vars.parse("REQUEST_LOG_CHANNEL_CAPACITY", DEFAULT_CHANNEL_CAPACITY)?;
        let channel_capacity = NonZeroUsize::new(capacity).ok_or_else(|| ConfigError::Invalid {
            key: "REQUEST_LOG_CHANNEL_CAPACITY".into(),
            message: "channel capacity cannot be zero".into(),
        })?;

        Ok(Self {
            enabled: vars.bool("REQUEST_LOG", true),
            starts_with_blacklist: vars.list("REQUEST_LOG_STARTS_WITH_BLACKLIST"),
            equality_blacklist: vars.list("REQUEST_LOG_EQUALITY_BLACKLIST"),
            sink,
            channel_capacity,
        })
    }

    /// Queue size for [`SinkKind::Channel`] (never zero).
    #[inline]
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.get()
    }

    /// Build the blacklist from both configured sets.
    pub fn blacklist(&self) -> Blacklist {
        Blacklist::new(&self.starts_with_blacklist, &self.equality_blacklist)
    }
}

impl Default for RequestLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            starts_with_blacklist: Vec::new(),
            equality_blacklist: Vec::new(),
            sink: SinkKind::default(),
            channel_capacity: NonZeroUsize::new(DEFAULT_CHANNEL_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        }
    }
}
