//! Client configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables prefixed with
//! `FINANCE_` into a type-safe struct.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Default API server when `FINANCE_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://api.arulajeh.id";

/// Client configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `FINANCE_API_URL` (optional): base URL of the finance API
/// - `FINANCE_TOKEN_FILE` (optional): where the access/refresh tokens are persisted
/// - `FINANCE_REQUEST_TIMEOUT_SECS` (optional): per-request timeout, defaults to 10
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,

    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// `$HOME/.finance-client/tokens.json`, or relative to the working directory
/// when there is no home.
fn default_token_file() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".finance-client")
        .join("tokens.json")
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_file: default_token_file(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed into the
    /// expected type (e.g. a non-numeric timeout).
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // FINANCE_API_URL -> api_url
        envy::prefixed("FINANCE_").from_env::<Config>()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
