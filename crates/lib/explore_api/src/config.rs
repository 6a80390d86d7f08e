//! API server configuration.

use explore_core::credentials::DEFAULT_API_KEY_VAR;
use explore_core::upstream::{DEFAULT_COMPLETIONS_URL, DEFAULT_MODEL};
use thiserror::Error;
use url::Url;

/// Default listener address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL in {var}: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3000").
    pub bind_addr: String,
    /// Upstream chat completions endpoint.
    pub upstream_url: Url,
    /// Model identifier sent upstream with every request.
    pub upstream_model: String,
    /// Environment variable holding the upstream API key. Read per request.
    pub api_key_var: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            upstream_url: Url::parse(DEFAULT_COMPLETIONS_URL)
                .expect("default upstream URL is valid"),
            upstream_model: DEFAULT_MODEL.into(),
            api_key_var: DEFAULT_API_KEY_VAR.into(),
        }
    }
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable               | Default                                          |
    /// |------------------------|--------------------------------------------------|
    /// | `BIND_ADDR`            | `127.0.0.1:3000`                                 |
    /// | `UPSTREAM_URL`         | `https://openrouter.ai/api/v1/chat/completions`  |
    /// | `UPSTREAM_MODEL`       | `meta-llama/llama-3.1-8b-instruct:free`          |
    /// | `UPSTREAM_API_KEY_VAR` | `OPENROUTER_API_KEY`                             |
    ///
    /// The API key itself is not read here.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let upstream_url = match lookup("UPSTREAM_URL") {
            Some(raw) => Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
                var: "UPSTREAM_URL",
                source,
            })?,
            None => defaults.upstream_url,
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            upstream_url,
            upstream_model: lookup("UPSTREAM_MODEL").unwrap_or(defaults.upstream_model),
            api_key_var: lookup("UPSTREAM_API_KEY_VAR").unwrap_or(defaults.api_key_var),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.upstream_url.as_str(), DEFAULT_COMPLETIONS_URL);
        assert_eq!(config.upstream_model, DEFAULT_MODEL);
        assert_eq!(config.api_key_var, "OPENROUTER_API_KEY");
    }

    #[test]
    fn environment_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("UPSTREAM_URL", "http://localhost:11434/v1/chat/completions"),
            ("UPSTREAM_MODEL", "llama3.1"),
            ("UPSTREAM_API_KEY_VAR", "LOCAL_KEY"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.upstream_url.host_str(), Some("localhost"));
        assert_eq!(config.upstream_model, "llama3.1");
        assert_eq!(config.api_key_var, "LOCAL_KEY");
    }

    #[test]
    fn invalid_upstream_url_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[("UPSTREAM_URL", "not a url")])).unwrap_err();
        assert!(err.to_string().starts_with("Invalid URL in UPSTREAM_URL"));
    }
}
