//! Reconciler: desired group rosters vs. live remote state.
//!
//! Within a group that exists on both sides, the plan is plain set
//! difference: grant `desired − current`, revoke `current − desired`.
//! Handles compare case-insensitively, as platform logins do. Groups present
//! on only one side are reported, never created or deleted.

use std::collections::{BTreeMap, BTreeSet};

use crate::platform::RemoteState;

/// One membership change: `handle` in `group`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MembershipOp {
    pub group: String,
    pub handle: String,
}

impl MembershipOp {
    pub fn new(group: impl Into<String>, handle: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            handle: handle.into(),
        }
    }
}

/// Everything needed to bring one organization to its desired state.
///
/// Operations are ordered by group, then case-folded handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationPlan {
    pub grant: Vec<MembershipOp>,
    pub revoke: Vec<MembershipOp>,
    /// Desired groups with no remote counterpart.
    pub missing_groups: Vec<String>,
    /// Remote groups absent from the desired state.
    pub unexpected_groups: Vec<String>,
}

impl ReconciliationPlan {
    /// No grant or revoke operations.
    pub fn is_noop(&self) -> bool {
        self.grant.is_empty() && self.revoke.is_empty()
    }

    /// Desired and remote group sets differ.
    pub fn has_structural_mismatch(&self) -> bool {
        !self.missing_groups.is_empty() || !self.unexpected_groups.is_empty()
    }

    /// The remote state after every operation in this plan succeeded.
    ///
    /// Groups are neither created nor removed.
    pub fn apply_to(&self, current: &RemoteState) -> RemoteState {
        let mut next = current.clone();
        for op in &self.grant {
            if let Some(members) = next.groups.get_mut(&op.group) {
                members.insert(op.handle.clone());
            }
        }
        for op in &self.revoke {
            if let Some(members) = next.groups.get_mut(&op.group) {
                members.remove(&op.handle);
            }
        }
        next
    }
}

/// Diff desired rosters (slug → handles) against the live state.
pub fn reconcile(
    desired: &BTreeMap<String, BTreeSet<String>>,
    current: &RemoteState,
) -> ReconciliationPlan {
    let mut plan = ReconciliationPlan::default();

    for (slug, wanted) in desired {
        let Some(present) = current.group(slug) else {
            plan.missing_groups.push(slug.clone());
            continue;
        };
        let wanted = fold_handles(wanted);
        let present = fold_handles(present);
        // Grants keep the desired spelling, revokes the remote one.
        plan.grant.extend(
            wanted
                .iter()
                .filter(|(key, _)| !present.contains_key(*key))
                .map(|(_, handle)| MembershipOp::new(slug.as_str(), *handle)),
        );
        plan.revoke.extend(
            present
                .iter()
                .filter(|(key, _)| !wanted.contains_key(*key))
                .map(|(_, handle)| MembershipOp::new(slug.as_str(), *handle)),
        );
    }

    plan.unexpected_groups = current
        .groups
        .keys()
        .filter(|slug| !desired.contains_key(*slug))
        .cloned()
        .collect();

    plan
}

/// Lowercased handle → first spelling seen.
fn fold_handles(handles: &BTreeSet<String>) -> BTreeMap<String, &str> {
    let mut folded = BTreeMap::new();
    for handle in handles {
        folded
            .entry(handle.to_lowercase())
            .or_insert(handle.as_str());
    }
    folded
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
