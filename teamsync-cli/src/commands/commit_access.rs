//! `teamsync commit-access`: apply access.json to GitHub team memberships.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use teamsync_core::store;
use teamsync_remote::{GitHubClient, GitHubConfig};
use teamsync_sync::{commit_access, CommitOptions, MembershipRole, OrgCommitResult};

/// Arguments for `teamsync commit-access`.
#[derive(Args, Debug)]
pub struct CommitAccessArgs {
    /// Role granted to members added to a team.
    #[arg(long, default_value_t = MembershipRole::Maintainer)]
    pub role: MembershipRole,

    /// Read GitHub and print the plan without changing anything.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "action")]
    action: String,
    #[tabled(rename = "team")]
    team: String,
    #[tabled(rename = "user")]
    user: String,
    #[tabled(rename = "result")]
    result: String,
}

impl CommitAccessArgs {
    pub fn run(self, data_dir: &Path) -> Result<bool> {
        let config = GitHubConfig::from_env()?;
        let client = GitHubClient::new(config);
        let access = store::load_access_at(data_dir)
            .context("failed to load access.json, run `teamsync compute-access` first")?;

        let options = CommitOptions {
            role: self.role,
            dry_run: self.dry_run,
        };
        let results = commit_access(&client, &access, options).context("commit-access failed")?;

        if results.is_empty() {
            println!("No organizations in access.json.");
        }
        for result in &results {
            print_result(result, self.dry_run);
        }
        Ok(results.iter().all(OrgCommitResult::is_success))
    }
}

fn plan_rows(result: &OrgCommitResult, dry_run: bool) -> Vec<PlanRow> {
    let outcome = |action: &str, group: &str, handle: &str| -> String {
        if dry_run {
            return "planned".to_string();
        }
        let failed = result.report.as_ref().and_then(|report| {
            report.failed.iter().find(|f| {
                f.kind.to_string() == action && f.op.group == group && f.op.handle == handle
            })
        });
        match failed {
            Some(f) => format!("failed: {}", f.error),
            None => "ok".to_string(),
        }
    };

    let grants = result.plan.grant.iter().map(|op| ("grant", op));
    let revokes = result.plan.revoke.iter().map(|op| ("revoke", op));
    grants
        .chain(revokes)
        .map(|(action, op)| PlanRow {
            action: action.to_string(),
            team: op.group.clone(),
            user: op.handle.clone(),
            result: outcome(action, &op.group, &op.handle),
        })
        .collect()
}

fn print_result(result: &OrgCommitResult, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let org = &result.org;

    if result.plan.is_noop() {
        println!("{prefix}{} '{org}': nothing to do", "✓".green());
    } else {
        let rows = plan_rows(result, dry_run);
        if !rows.is_empty() {
            println!("{prefix}'{org}':");
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }

    let plan = &result.plan;
    if !plan.missing_groups.is_empty() {
        println!(
            "  {} teams missing on GitHub: {}",
            "✗".red(),
            plan.missing_groups.join(", ")
        );
    }
    if !plan.unexpected_groups.is_empty() {
        println!(
            "  {} teams on GitHub but not in access.json: {}",
            "✗".red(),
            plan.unexpected_groups.join(", ")
        );
    }

    if let Some(report) = &result.report {
        let summary = format!(
            "'{org}': {} granted, {} revoked, {} failed",
            report.granted.len(),
            report.revoked.len(),
            report.failed.len()
        );
        if report.is_success() {
            println!("{} {summary}", "✓".green());
        } else {
            println!("{} {summary}", "✗".red());
        }
    }
}
