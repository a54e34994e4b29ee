// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the client. Configuration is loaded from the environment at
//! startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `BANK_API_BASE_URL` | Origin of the banking REST backend | `http://localhost:8080` |
//! | `BANK_HTTP_TIMEOUT_SECS` | Transport timeout for a single request | `15` |
//! | `BANK_FETCH_TIMEOUT_SECS` | Upper bound for a view-bound fetch | `20` |
//! | `BANK_USERNAME` | Username used by the binary to log in | Required by the binary |
//! | `BANK_PASSWORD` | Password used by the binary to log in | Required by the binary |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,bank_client=debug` |

use std::time::Duration;

use url::Url;

/// Environment variable name for the backend origin.
///
/// Every endpoint path (`/api/...`) is resolved against this URL.
pub const API_BASE_URL_ENV: &str = "BANK_API_BASE_URL";

/// Environment variable name for the per-request transport timeout, in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "BANK_HTTP_TIMEOUT_SECS";

/// Environment variable name for the view-bound fetch timeout, in seconds.
///
/// A fetch that outlives this bound is abandoned and the view leaves its
/// loading state with an error modal.
pub const FETCH_TIMEOUT_ENV: &str = "BANK_FETCH_TIMEOUT_SECS";

/// Environment variable name for the login username used by the binary.
pub const USERNAME_ENV: &str = "BANK_USERNAME";

/// Environment variable name for the login password used by the binary.
pub const PASSWORD_ENV: &str = "BANK_PASSWORD";

/// Environment variable selecting `json` or `pretty` log output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_LOG_FILTER: &str = "info,bank_client=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration missing: {0}")]
    Missing(String),

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidDuration { name: String, value: String },
}

/// Client configuration resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub http_timeout: Duration,
    pub fetch_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve configuration through an arbitrary lookup, so tests do not
    /// have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match non_empty(lookup(API_BASE_URL_ENV)) {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
                name: API_BASE_URL_ENV.to_string(),
                reason: e.to_string(),
            })?,
            None => default_base_url(),
        };

        let http_timeout = parse_secs(HTTP_TIMEOUT_ENV, lookup(HTTP_TIMEOUT_ENV))?
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);
        let fetch_timeout = parse_secs(FETCH_TIMEOUT_ENV, lookup(FETCH_TIMEOUT_ENV))?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT);

        Ok(Self {
            base_url,
            http_timeout,
            fetch_timeout,
        })
    }
}

/// Credentials the binary logs in with.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            username: env_required(USERNAME_ENV)?,
            password: env_required(PASSWORD_ENV)?,
        })
    }
}

/// Whether logs should be emitted as JSON lines.
pub fn json_logs_enabled() -> bool {
    non_empty(std::env::var(LOG_FORMAT_ENV).ok())
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn default_base_url() -> Url {
    // The default is a constant literal; parsing it cannot fail.
    Url::parse(DEFAULT_API_BASE_URL).unwrap_or_else(|_| unreachable!())
}

fn env_required(name: &str) -> Result<String, ConfigError> {
    non_empty(std::env::var(name).ok()).ok_or_else(|| ConfigError::Missing(name.to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_secs(name: &str, raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(ConfigError::InvalidDuration {
            name: name.to_string(),
            value: raw,
        }),
    }
}
