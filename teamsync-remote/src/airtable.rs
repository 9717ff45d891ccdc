//! Airtable record source.
//!
//! Lists every record of a table, following the `offset` cursor until the
//! service stops returning one. Nothing is returned until all pages are in.

use serde::Deserialize;

use teamsync_core::records::{RawFields, PEOPLE_TABLE, ROLES_TABLE, TEAMS_TABLE};
use teamsync_core::{RawRecords, RawTable};

use crate::config::AirtableConfig;
use crate::error::{HttpError, SourceError};
use crate::http;

/// Maximum page size Airtable accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Per-table listing options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Restrict the listing to a named view.
    pub view: Option<String>,
    pub page_size: usize,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            view: None,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// A tabular store that can list every record of a table.
pub trait RecordSource {
    fn fetch_all(&self, table: &str, options: &FetchOptions) -> Result<RawTable, SourceError>;
}

/// Fetch the people, teams and roles tables.
pub fn fetch_records(
    source: &impl RecordSource,
    options: &FetchOptions,
) -> Result<RawRecords, SourceError> {
    Ok(RawRecords {
        people: source.fetch_all(PEOPLE_TABLE, options)?,
        teams: source.fetch_all(TEAMS_TABLE, options)?,
        roles: source.fetch_all(ROLES_TABLE, options)?,
    })
}

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    records: Vec<ListedRecord>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListedRecord {
    id: String,
    #[serde(default)]
    fields: RawFields,
}

/// Blocking client for the Airtable REST API.
pub struct AirtableClient {
    agent: ureq::Agent,
    config: AirtableConfig,
}

impl AirtableClient {
    pub fn new(config: AirtableConfig) -> Self {
        Self {
            agent: http::agent(),
            config,
        }
    }

    fn table_url(&self, table: &str) -> String {
        http::join_url(
            &self.config.endpoint,
            &format!(
                "v0/{}/{}",
                urlencoding::encode(&self.config.base),
                urlencoding::encode(table)
            ),
        )
    }

    fn fetch_page(
        &self,
        url: &str,
        options: &FetchOptions,
        offset: Option<&str>,
    ) -> Result<ListPage, HttpError> {
        let page_size = options.page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        let mut request = self
            .agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.config.api_key))
            .query("pageSize", &page_size);
        if let Some(view) = &options.view {
            request = request.query("view", view);
        }
        if let Some(offset) = offset {
            request = request.query("offset", offset);
        }
        http::get_json(request)
    }
}

impl RecordSource for AirtableClient {
    fn fetch_all(&self, table: &str, options: &FetchOptions) -> Result<RawTable, SourceError> {
        let url = self.table_url(table);
        let mut records = RawTable::new();
        let mut offset: Option<String> = None;
        let mut page = 0usize;

        loop {
            tracing::info!("fetching {table} page {page}");
            let listed = self
                .fetch_page(&url, options, offset.as_deref())
                .map_err(|source| SourceError::Fetch {
                    table: table.to_string(),
                    source,
                })?;
            for record in listed.records {
                records.insert(record.id, record.fields);
            }
            match listed.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
            page += 1;
        }

        tracing::info!("fetched {} records from {table}", records.len());
        Ok(records)
    }
}
