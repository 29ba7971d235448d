//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable naming the metro data file.
pub const DATA_VAR: &str = "METRO_DATA";

/// Environment variable naming the listen address.
pub const ADDR_VAR: &str = "METRO_ADDR";

const DEFAULT_DATA_PATH: &str = "data/metro.json";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Error from reading server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
}

/// Where to read the metro data and where to listen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub data_path: PathBuf,
    pub addr: SocketAddr,
}

impl ServerConfig {
    /// Read configuration from `METRO_DATA` and `METRO_ADDR`, with defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_path = lookup(DATA_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let addr = lookup(ADDR_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr.trim().parse().map_err(|_| ConfigError::InvalidAddr {
            var: ADDR_VAR,
            value: addr.clone(),
        })?;

        Ok(Self { data_path, addr })
    }
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
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/metro.json"));
        assert_eq!(config.addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("METRO_DATA", "/srv/shanghai.json"),
            ("METRO_ADDR", "0.0.0.0:8080"),
        ]))
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("/srv/shanghai.json"));
        assert_eq!(config.addr.port(), 8080);
    }

    #[test]
    fn blank_values_use_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("METRO_DATA", ""), ("METRO_ADDR", "  ")]))
                .unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/metro.json"));
        assert_eq!(config.addr.port(), 3000);
    }

    #[test]
    fn invalid_addr() {
        let err = ServerConfig::from_lookup(lookup(&[("METRO_ADDR", "localhost")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidAddr {
                var: "METRO_ADDR",
                value: "localhost".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "METRO_ADDR is not a valid socket address: localhost"
        );
    }
}
