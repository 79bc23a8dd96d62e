//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default OpenAI-compatible chat completions endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model requested from the upstream API.
pub const DEFAULT_UPSTREAM_MODEL: &str = "gpt-4o-mini";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL in seconds for cached insights
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Chat completions endpoint
    pub upstream_url: String,
    /// Model name sent upstream
    pub upstream_model: String,
    /// Bound on a single upstream call, in seconds
    pub upstream_timeout: u64,
    /// Retry once on connection errors
    pub upstream_retry: bool,
    /// Bearer token for the upstream API
    pub api_key: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `DEFAULT_TTL` - Insight TTL in seconds (default: 3600)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `UPSTREAM_URL` - Chat completions endpoint
    /// - `UPSTREAM_MODEL` - Model name (default: gpt-4o-mini)
    /// - `UPSTREAM_TIMEOUT` - Upstream call bound in seconds (default: 30)
    /// - `UPSTREAM_RETRY` - Retry once on connection errors (default: true)
    /// - `OPENAI_API_KEY` - Upstream bearer token (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            upstream_url: env::var("UPSTREAM_URL").unwrap_or(defaults.upstream_url),
            upstream_model: env::var("UPSTREAM_MODEL").unwrap_or(defaults.upstream_model),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT").unwrap_or(defaults.upstream_timeout),
            upstream_retry: parse_var("UPSTREAM_RETRY").unwrap_or(defaults.upstream_retry),
            api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            default_ttl: 3600,
            server_port: 3000,
            cleanup_interval: 60,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            upstream_model: DEFAULT_UPSTREAM_MODEL.to_string(),
            upstream_timeout: 30,
            upstream_retry: true,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("max_entries", &self.max_entries)
            .field("default_ttl", &self.default_ttl)
            .field("server_port", &self.server_port)
            .field("cleanup_interval", &self.cleanup_interval)
            .field("upstream_url", &self.upstream_url)
            .field("upstream_model", &self.upstream_model)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("upstream_retry", &self.upstream_retry)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
