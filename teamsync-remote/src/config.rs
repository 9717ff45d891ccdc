//! Credentials and endpoints for the remote services.
//!
//! Each stage builds only the config it needs, once, in `main`, and passes
//! it to the client constructor. Values come from a lookup function so tests
//! never touch the process environment. Empty values count as missing.

use std::fmt;

use crate::error::ConfigError;

pub const AIRTABLE_API_KEY: &str = "AIRTABLE_API_KEY";
pub const AIRTABLE_BASE: &str = "AIRTABLE_BASE";
pub const AIRTABLE_ENDPOINT_URL: &str = "AIRTABLE_ENDPOINT_URL";
pub const GITHUB_TOKEN: &str = "GITHUB_TOKEN";
pub const GITHUB_API_URL: &str = "GITHUB_API_URL";

pub const DEFAULT_AIRTABLE_ENDPOINT: &str = "https://api.airtable.com";
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Record-source credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base: String,
    pub endpoint: String,
}

impl AirtableConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required(&lookup, AIRTABLE_API_KEY)?,
            base: required(&lookup, AIRTABLE_BASE)?,
            endpoint: optional(&lookup, AIRTABLE_ENDPOINT_URL)
                .unwrap_or_else(|| DEFAULT_AIRTABLE_ENDPOINT.to_string()),
        })
    }
}

impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"<redacted>")
            .field("base", &self.base)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Code-hosting platform credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    pub token: String,
    pub api_url: String,
}

impl GitHubConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_var)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            token: required(&lookup, GITHUB_TOKEN)?,
            api_url: optional(&lookup, GITHUB_API_URL)
                .unwrap_or_else(|| DEFAULT_GITHUB_API.to_string()),
        })
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, key).ok_or(ConfigError::MissingVar(key))
}
