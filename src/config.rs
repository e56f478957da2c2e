// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Configuration for the Tractive HTTP transport, loaded from environment
//! variables.
//!
//! The session adapter itself takes no configuration; these settings only
//! shape how the HTTP transport talks to the service.

use std::env;
use std::time::Duration;

/// Public base URL of the Tractive graph API.
pub const DEFAULT_API_URL: &str = "https://graph.tractive.com/4";

/// Client identifier sent by the Tractive web app.
pub const DEFAULT_CLIENT_ID: &str = "625e533dc3c3b41c28a669f0";

/// Default history window in hours.
pub const DEFAULT_HISTORY_HOURS: u32 = 2;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for API requests (no trailing slash)
    pub api_url: String,
    /// Value of the `X-Tractive-Client` header
    pub client_id: String,
    /// Default window for position history queries
    pub history_hours: u32,
    /// Per-request timeout handed to the HTTP client
    pub request_timeout: Duration,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            history_hours: DEFAULT_HISTORY_HOURS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional. A malformed `TRACTIVE_API_URL` is an
    /// error; malformed numbers fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("TRACTIVE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "TRACTIVE_API_URL",
                value: api_url,
            });
        }

        Ok(Self {
            api_url,
            client_id: env::var("TRACTIVE_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string()),
            history_hours: env::var("TRACTIVE_HISTORY_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_HISTORY_HOURS),
            request_timeout: Duration::from_secs(
                env::var("TRACTIVE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Single test touching the environment to avoid races between tests
        env::set_var("TRACTIVE_API_URL", "http://localhost:9999/4/");
        env::set_var("TRACTIVE_HISTORY_HOURS", "not-a-number");
        env::remove_var("TRACTIVE_TIMEOUT_SECS");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_url, "http://localhost:9999/4");
        assert_eq!(config.history_hours, DEFAULT_HISTORY_HOURS);
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        env::set_var("TRACTIVE_API_URL", "graph.tractive.com");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "TRACTIVE_API_URL", .. }));

        env::remove_var("TRACTIVE_API_URL");
        env::remove_var("TRACTIVE_HISTORY_HOURS");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.history_hours, 2);
    }
}
