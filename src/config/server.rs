//! Server configuration.

use std::net::SocketAddr;

use super::parse::Vars;
use super::ConfigError;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// HTTP host configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (default: 0.0.0.0:8080).
    pub listen_addr: SocketAddr,
}

impl ServerConfig {
    pub(crate) fn from_vars(vars: &Vars) -> Result<Self, ConfigError> {
        let raw = vars.or("LISTEN_ADDR", DEFAULT_LISTEN_ADDR);
        let listen_addr = raw.parse().map_err(|e| ConfigError::Parse {
            key: "LISTEN_ADDR".into(),
            value: raw.clone(),
            error: format!("{}", e),
        })?;

        Ok(Self { listen_addr })
    }
}
