//! Commit pipeline: read → plan → execute, one organization at a time.
//!
//! All reads for an organization complete before its plan is computed, and
//! every write happens after. Organizations are processed in name order.

use teamsync_core::{AccessModel, OrgAccess};

use crate::error::{read_err, SyncError};
use crate::executor::{execute, ExecutionReport};
use crate::platform::{read_remote_state, MembershipRole, RemotePlatform};
use crate::reconcile::{reconcile, ReconciliationPlan};

/// Options shared by every organization in a commit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOptions {
    /// Role granted to added members.
    pub role: MembershipRole,
    /// Compute the plan but skip every write.
    pub dry_run: bool,
}

/// Outcome of committing one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgCommitResult {
    pub org: String,
    pub plan: ReconciliationPlan,
    /// `None` in dry-run mode.
    pub report: Option<ExecutionReport>,
}

impl OrgCommitResult {
    pub fn is_success(&self) -> bool {
        match &self.report {
            Some(report) => report.is_success(),
            None => !self.plan.has_structural_mismatch(),
        }
    }
}

/// Reconcile and (unless dry-run) apply the desired state of one org.
pub fn commit_org(
    platform: &impl RemotePlatform,
    org: &str,
    access: &OrgAccess,
    options: CommitOptions,
) -> Result<OrgCommitResult, SyncError> {
    tracing::info!("committing access for GitHub org {org}");
    let current = read_remote_state(platform, org).map_err(|e| read_err(org, e))?;
    let plan = reconcile(&access.teams, &current);
    tracing::info!(
        "org {org}: {} to grant, {} to revoke, {} missing, {} unexpected",
        plan.grant.len(),
        plan.revoke.len(),
        plan.missing_groups.len(),
        plan.unexpected_groups.len(),
    );

    let report = if options.dry_run {
        None
    } else {
        Some(execute(platform, org, &plan, options.role))
    };

    Ok(OrgCommitResult {
        org: org.to_string(),
        plan,
        report,
    })
}

/// Commit every organization in the access model.
///
/// A failed read aborts the run; structural mismatches and failed writes are
/// reported through each [`OrgCommitResult`] instead.
pub fn commit_access(
    platform: &impl RemotePlatform,
    access: &AccessModel,
    options: CommitOptions,
) -> Result<Vec<OrgCommitResult>, SyncError> {
    let mut results = Vec::new();
    for (org, org_access) in &access.github {
        results.push(commit_org(platform, org, org_access, options)?);
    }
    Ok(results)
}
