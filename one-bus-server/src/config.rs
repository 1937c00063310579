//! Server configuration from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::oba::ObaConfig;

/// An environment variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for {name}: {value:?}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
}

/// Everything `main` needs to start serving.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (`ONE_BUS_ADDR`)
    pub addr: SocketAddr,
    /// Upstream client settings (`ONE_BUS_BASE_URL`, `ONE_BUS_TIMEOUT_SECS`)
    pub oba: ObaConfig,
    /// Response cache (`ONE_BUS_CACHE_TTL_SECS`, `ONE_BUS_CACHE_CAPACITY`)
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults_oba = ObaConfig::default();
        let defaults_cache = CacheConfig::default();

        let addr = parse_var(&lookup, "ONE_BUS_ADDR")?.unwrap_or_else(default_addr);

        let mut oba = defaults_oba;
        if let Some(base_url) = lookup("ONE_BUS_BASE_URL").filter(|s| !s.is_empty()) {
            oba = oba.with_base_url(base_url);
        }
        if let Some(secs) = parse_var(&lookup, "ONE_BUS_TIMEOUT_SECS")? {
            oba = oba.with_timeout(secs);
        }

        let cache = CacheConfig {
            ttl: parse_var(&lookup, "ONE_BUS_CACHE_TTL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults_cache.ttl),
            max_capacity: parse_var(&lookup, "ONE_BUS_CACHE_CAPACITY")?
                .unwrap_or(defaults_cache.max_capacity),
        };

        Ok(Self { addr, oba, cache })
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn parse_var<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::oba::DEFAULT_BASE_URL;

    fn config_from(vars: &[(&'static str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<&str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.oba.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.oba.timeout_secs, 30);
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
        assert_eq!(config.cache.max_capacity, 1000);
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("ONE_BUS_ADDR", "0.0.0.0:8080"),
            ("ONE_BUS_BASE_URL", "http://localhost:9000/api/where"),
            ("ONE_BUS_TIMEOUT_SECS", "5"),
            ("ONE_BUS_CACHE_TTL_SECS", "0"),
            ("ONE_BUS_CACHE_CAPACITY", "10"),
        ])
        .unwrap();

        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.oba.base_url, "http://localhost:9000/api/where");
        assert_eq!(config.oba.timeout_secs, 5);
        assert!(!config.cache.is_enabled());
        assert_eq!(config.cache.max_capacity, 10);
    }

    #[test]
    fn empty_base_url_keeps_default() {
        let config = config_from(&[("ONE_BUS_BASE_URL", "")]).unwrap();
        assert_eq!(config.oba.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = config_from(&[("ONE_BUS_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError {
                name: "ONE_BUS_TIMEOUT_SECS",
                value: "soon".into()
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid value for ONE_BUS_TIMEOUT_SECS: \"soon\""
        );

        assert!(config_from(&[("ONE_BUS_ADDR", "localhost")]).is_err());
    }
}
