//! Client configuration.
//!
//! The backend base address is the only setting. It is resolved once, by the
//! caller, and handed to the client at construction; nothing in this crate
//! reads the process environment on its own.

/// Environment variable consulted by `ClientConfig::from_env`.
pub const API_BASE_ENV: &str = "REACT_APP_API_BASE";

/// Base address used when no override is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    /// Resolve the base address from `REACT_APP_API_BASE`, falling back to
    /// `DEFAULT_API_BASE` when unset or empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same resolution as `from_env` against an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let api_base = lookup(API_BASE_ENV)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Self { api_base }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}
