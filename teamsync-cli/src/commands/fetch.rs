//! `teamsync fetch`: download the Airtable directory into data.json.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use teamsync_core::{normalize, store};
use teamsync_remote::{fetch_records, AirtableClient, AirtableConfig, FetchOptions};

/// Arguments for `teamsync fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Only list records visible in this Airtable view.
    #[arg(long)]
    pub view: Option<String>,
}

impl FetchArgs {
    pub fn run(self, data_dir: &Path) -> Result<bool> {
        let config = AirtableConfig::from_env()?;
        let client = AirtableClient::new(config);
        let options = FetchOptions {
            view: self.view,
            ..FetchOptions::default()
        };

        let raw = fetch_records(&client, &options).context("failed to fetch Airtable records")?;
        let directory = normalize(&raw);
        let write = store::save_directory_at(data_dir, &directory)
            .with_context(|| format!("failed to write {}", data_dir.display()))?;

        println!(
            "✓ fetched {} people, {} teams, {} roles",
            directory.people.len(),
            directory.teams.len(),
            directory.roles.len()
        );
        super::print_write(&write);
        Ok(true)
    }
}
