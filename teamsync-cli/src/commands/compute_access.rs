//! `teamsync compute-access`: derive access.json from data.json.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use teamsync_core::access::{DEFAULT_ADMIN_ROLE, DEFAULT_ORG};
use teamsync_core::{calculate_access, store, AccessConfig, RoleId};
use teamsync_sync::diff_access;

/// Arguments for `teamsync compute-access`.
#[derive(Args, Debug)]
pub struct ComputeAccessArgs {
    /// Role whose holders become organization owners.
    #[arg(long, default_value = DEFAULT_ADMIN_ROLE)]
    pub admin_role: String,

    /// GitHub organization the access model is keyed under.
    #[arg(long, default_value = DEFAULT_ORG)]
    pub org: String,

    /// Print a unified diff against the existing access.json before writing.
    #[arg(long)]
    pub diff: bool,
}

impl ComputeAccessArgs {
    pub fn run(self, data_dir: &Path) -> Result<bool> {
        let directory = store::load_directory_at(data_dir)
            .context("failed to load directory, run `teamsync fetch` first")?;
        let config = AccessConfig {
            admin_role: RoleId::from(self.admin_role.as_str()),
            org: self.org,
        };
        let access = calculate_access(&directory, &config);

        if self.diff {
            match diff_access(data_dir, &access).context("failed to diff access.json")? {
                Some(diff) => {
                    print!("{}", diff.unified_diff);
                    if !diff.unified_diff.ends_with('\n') {
                        println!();
                    }
                }
                None => println!("No differences in access.json."),
            }
        }

        let write = store::save_access_at(data_dir, &access)
            .with_context(|| format!("failed to write access.json in {}", data_dir.display()))?;

        for (org, org_access) in &access.github {
            println!(
                "✓ '{org}': {} owners, {} members, {} teams",
                org_access.owners.len(),
                org_access.members.len(),
                org_access.teams.len()
            );
        }
        super::print_write(&write);
        Ok(true)
    }
}
