//! Server configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use http::HeaderValue;

/// Default listen port, the protocol's registered port.
pub const DEFAULT_PORT: u16 = 4840;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind: IpAddr,
    /// Server port to listen on.
    pub port: u16,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// CORS allowed origins (comma-separated or "*" for all).
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `ADDRSPACE_PORT`: Server port (default: 4840)
    /// - `ADDRSPACE_BIND`: Bind address (default: "0.0.0.0")
    /// - `LOG_LEVEL`: Logging level (default: "info")
    /// - `CORS_ALLOWED_ORIGINS`: Allowed CORS origins (default: "*")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("ADDRSPACE_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "ADDRSPACE_PORT".to_string(),
                reason: format!("{raw:?} is not a port number"),
            })?,
            None => defaults.port,
        };

        let bind = match lookup("ADDRSPACE_BIND") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "ADDRSPACE_BIND".to_string(),
                reason: format!("{raw:?} is not an IP address"),
            })?,
            None => defaults.bind,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);
        let cors_allowed_origins =
            lookup("CORS_ALLOWED_ORIGINS").unwrap_or(defaults.cors_allowed_origins);

        let config = Self {
            bind,
            port,
            log_level,
            cors_allowed_origins,
        };
        config.cors_origins()?;
        Ok(config)
    }

    /// Get the socket address for the server.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Parsed CORS origins. `None` means any origin.
    pub fn cors_origins(&self) -> Result<Option<Vec<HeaderValue>>, ConfigError> {
        if self.cors_allowed_origins.trim() == "*" {
            return Ok(None);
        }
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin.parse().map_err(|_| ConfigError::InvalidValue {
                    name: "CORS_ALLOWED_ORIGINS".to_string(),
                    reason: format!("{origin:?} is not a valid origin"),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.port, 4840);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.cors_allowed_origins, "*");
        assert_eq!(config.socket_addr(), "0.0.0.0:4840".parse().unwrap());
        assert_eq!(config.cors_origins().unwrap(), None);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ADDRSPACE_PORT", "48010"),
            ("ADDRSPACE_BIND", "127.0.0.1"),
            ("LOG_LEVEL", "debug"),
            ("CORS_ALLOWED_ORIGINS", "http://a.example, http://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:48010".parse().unwrap());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.cors_origins().unwrap().map(|o| o.len()), Some(2));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("ADDRSPACE_PORT", "opc")])).unwrap_err();
        assert!(err.to_string().contains("ADDRSPACE_PORT"));
    }

    #[test]
    fn test_invalid_bind() {
        let err = ServerConfig::from_lookup(lookup(&[("ADDRSPACE_BIND", "localhost")])).unwrap_err();
        assert!(err.to_string().contains("ADDRSPACE_BIND"));
    }

    #[test]
    fn test_invalid_origin() {
        let err = ServerConfig::from_lookup(lookup(&[("CORS_ALLOWED_ORIGINS", "http://ok,http://a\u{1}b")]))
            .unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOWED_ORIGINS"));
    }
}
