//! Environment variable parsing utilities.

use std::collections::HashMap;
use std::str::FromStr;

use super::ConfigError;

/// A source of configuration variables.
///
/// The process environment in production; a fixed map in tests, so
/// tests never race on the real environment.
pub struct Vars {
    lookup: Box<dyn Fn(&str) -> Option<String>>,
}

impl Vars {
    /// Read from the process environment.
    pub fn process() -> Self {
        Self {
            lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Read from a fixed set of pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            lookup: Box::new(move |key| map.get(key).cloned()),
        }
    }

    /// No variables set at all.
    pub fn empty() -> Self {
        Self {
            lookup: Box::new(|_| None),
        }
    }

    /// Raw value, if set.
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
    }

    /// Get variable with default value.
    pub fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Get optional variable (None if empty or missing).
    pub fn opt(&self, key: &str) -> Option<String> {
        self.get(key).filter(|s| !s.is_empty())
    }

    /// Parse variable as boolean.
    /// Treats "1", "true" (case-insensitive) as true.
    pub fn bool(&self, key: &str, default: bool) -> bool {
        self.get(key)
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(default)
    }

    /// Parse variable with type conversion.
    pub fn parse<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            Some(v) if !v.is_empty() => v.parse().map_err(|e: T::Err| ConfigError::Parse {
                key: key.into(),
                value: v,
                error: e.to_string(),
            }),
            _ => Ok(default),
        }
    }

    /// Comma-separated list; entries are trimmed and empty ones skipped.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key).map(|v| split_list(&v)).unwrap_or_default()
    }
}

/// Split a comma-separated value into trimmed, non-empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
