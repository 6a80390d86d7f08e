//! Upstream credential lookup.
//!
//! The relay resolves its API key on every request instead of at startup, so a
//! missing key fails that request only. Lookup sits behind
//! [`CredentialProvider`] so tests can inject a key or its absence without
//! touching the process environment.

use std::env;

/// Default environment variable holding the upstream API key.
pub const DEFAULT_API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Source of the upstream bearer credential.
pub trait CredentialProvider: Send + Sync {
    /// Returns the API key, or `None` when it is not configured.
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from a process environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Name of the variable consulted.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_VAR)
    }
}

impl CredentialProvider for EnvCredentials {
    fn api_key(&self) -> Option<String> {
        env::var(&self.var).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Fixed credential, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<String>);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    /// A provider that never yields a key.
    pub fn missing() -> Self {
        Self(None)
    }
}

impl CredentialProvider for StaticCredentials {
    fn api_key(&self) -> Option<String> {
        self.0.clone().filter(|v| !v.trim().is_empty())
    }
}
