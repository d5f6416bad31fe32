//! Configuration loaded from environment variables.
//!
//! Read once at startup and immutable afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use request_log::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Listen address: {}", config.server.listen_addr);
//! println!("Blacklist: {:?}", config.request_log.blacklist());
//! ```

mod error;
mod logging;
mod parse;
mod request_log;
mod server;
mod service;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use parse::{split_list, Vars};
pub use self::request_log::{RequestLogConfig, SinkKind};
pub use server::ServerConfig;
pub use service::ServiceInfo;

/// Complete application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub request_log: RequestLogConfig,
    pub service: ServiceInfo,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&Vars::process())
    }

    pub fn from_vars(vars: &Vars) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_vars(vars)?,
            request_log: RequestLogConfig::from_vars(vars)?,
            service: ServiceInfo::from_vars(vars),
            logging: LoggingConfig::from_vars(vars)?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Listen: {}", self.server.listen_addr);

        if let Some(ref service_type) = self.service.service_type {
            info!("  Service type: {}", service_type);
        }

        if !self.request_log.enabled {
            info!("  Request log: disabled");
            return;
        }

        info!("  Request log sink: {:?}", self.request_log.sink);
        if self.request_log.sink == SinkKind::Channel {
            info!(
                "  Request log queue: {}",
                self.request_log.channel_capacity()
            );
        }
        if !self.request_log.starts_with_blacklist.is_empty() {
            info!(
                "  Prefix blacklist: {}",
                self.request_log.starts_with_blacklist.join(", ")
            );
        }
        if !self.request_log.equality_blacklist.is_empty() {
            info!(
                "  Exact blacklist: {}",
                self.request_log.equality_blacklist.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(&Vars::empty()).expect("Should load config");

        assert_eq!(config.server.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(config.request_log.enabled);
        assert_eq!(config.request_log.sink, SinkKind::Tracing);
        assert_eq!(config.service, ServiceInfo::default());
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.service_name, "request_log");
    }

    #[test]
    fn test_config_from_vars() {
        let vars = Vars::from_pairs([
            ("LISTEN_ADDR", "127.0.0.1:9000"),
            ("SERVICE_TYPE", "order-service"),
            ("REQUEST_LOG_EQUALITY_BLACKLIST", "/health"),
            ("REQUEST_LOG_SINK", "stdout"),
        ]);
        let config = Config::from_vars(&vars).unwrap();

        assert_eq!(config.server.listen_addr.port(), 9000);
        assert_eq!(config.service.service_type.as_deref(), Some("order-service"));
        assert_eq!(config.request_log.sink, SinkKind::Stdout);
        assert!(!config.request_log.blacklist().should_log("/health"));
    }

    #[test]
    fn test_first_error_wins() {
        let vars = Vars::from_pairs([("LISTEN_ADDR", "nope"), ("LOG_FORMAT", "xml")]);
        let err = Config::from_vars(&vars).unwrap_err();
        assert!(err.to_string().contains("LISTEN_ADDR"));
    }
}
