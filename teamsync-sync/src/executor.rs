//! Operation executor: applies a [`ReconciliationPlan`] to the platform.
//!
//! Grants run first, then revokes. Each call stands alone: a failure is
//! logged, recorded in the report, and the next operation proceeds. A re-run
//! converges because the plan is recomputed from live state.

use std::fmt;

use crate::platform::{MembershipRole, RemotePlatform};
use crate::reconcile::{MembershipOp, ReconciliationPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Grant,
    Revoke,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Grant => write!(f, "grant"),
            OpKind::Revoke => write!(f, "revoke"),
        }
    }
}

/// An operation the platform rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedOp {
    pub kind: OpKind,
    pub op: MembershipOp,
    pub error: String,
}

/// Terminal outcome of executing one organization's plan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionReport {
    pub org: String,
    pub granted: Vec<MembershipOp>,
    pub revoked: Vec<MembershipOp>,
    pub failed: Vec<FailedOp>,
    pub missing_groups: Vec<String>,
    pub unexpected_groups: Vec<String>,
}

impl ExecutionReport {
    /// True when every operation succeeded and desired and remote group sets
    /// matched.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.missing_groups.is_empty() && self.unexpected_groups.is_empty()
    }
}

/// Apply every operation in `plan` to `org`, continuing past failures.
pub fn execute(
    platform: &impl RemotePlatform,
    org: &str,
    plan: &ReconciliationPlan,
    role: MembershipRole,
) -> ExecutionReport {
    let mut report = ExecutionReport {
        org: org.to_string(),
        missing_groups: plan.missing_groups.clone(),
        unexpected_groups: plan.unexpected_groups.clone(),
        ..ExecutionReport::default()
    };

    for op in &plan.grant {
        tracing::info!("granting access to {} for {}", op.group, op.handle);
        match platform.upsert_membership(org, &op.group, &op.handle, role) {
            Ok(()) => report.granted.push(op.clone()),
            Err(err) => {
                tracing::error!("grant {} in {} failed: {err}", op.handle, op.group);
                report.failed.push(FailedOp {
                    kind: OpKind::Grant,
                    op: op.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    for op in &plan.revoke {
        tracing::info!("revoking access to {} for {}", op.group, op.handle);
        match platform.remove_membership(org, &op.group, &op.handle) {
            Ok(()) => report.revoked.push(op.clone()),
            Err(err) => {
                tracing::error!("revoke {} in {} failed: {err}", op.handle, op.group);
                report.failed.push(FailedOp {
                    kind: OpKind::Revoke,
                    op: op.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    if !report.missing_groups.is_empty() {
        tracing::error!("missing teams: {}", report.missing_groups.join(", "));
    }
    if !report.unexpected_groups.is_empty() {
        tracing::error!("unexpected teams: {}", report.unexpected_groups.join(", "));
    }
    if report.is_success() {
        tracing::info!("successfully committed changes for org: {org}");
    }

    report
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
