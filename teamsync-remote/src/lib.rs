//! # teamsync-remote
//!
//! Clients for the two remote services: the Airtable record source and the
//! GitHub team API, plus the environment-backed configuration they need.

pub mod airtable;
pub mod config;
pub mod error;
pub mod github;
mod http;

pub use airtable::{fetch_records, AirtableClient, FetchOptions, RecordSource};
pub use config::{AirtableConfig, GitHubConfig};
pub use error::{ConfigError, HttpError, SourceError};
pub use github::GitHubClient;
