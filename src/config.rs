//! Service configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const BIND_ADDR_VAR: &str = "SELECTION_BIND_ADDR";
pub const SNAPSHOT_VAR: &str = "SELECTION_SNAPSHOT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// Marketplace snapshot used to seed the in-memory stores.
    pub snapshot_path: Option<PathBuf>,
}

impl ServiceConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr {
                var: BIND_ADDR_VAR,
                value: raw_addr.clone(),
            })?;

        let snapshot_path = lookup(SNAPSHOT_VAR)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            snapshot_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.snapshot_path, None);
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "127.0.0.1:9000"),
            (SNAPSHOT_VAR, "/data/market.json"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/data/market.json")));
    }

    #[test]
    fn test_invalid_bind_addr() {
        let err = ServiceConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])).unwrap_err();
        assert!(err.to_string().contains("localhost"));
    }
}
