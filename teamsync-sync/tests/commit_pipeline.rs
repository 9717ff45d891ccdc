//! Commit pipeline against an in-memory platform.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use teamsync_core::{AccessModel, OrgAccess};
use teamsync_sync::{
    commit_access, commit_org, CommitOptions, MembershipOp, MembershipRole, PlatformError,
    RemoteGroup, RemotePlatform, SyncError,
};

// ---------------------------------------------------------------------------
// In-memory platform
// ---------------------------------------------------------------------------

#[derive(Default)]
struct InMemoryPlatform {
    /// org → slug → handles
    orgs: RefCell<BTreeMap<String, BTreeMap<String, BTreeSet<String>>>>,
    /// Every call, in order, e.g. `list acme`, `put acme/core/a`.
    log: RefCell<Vec<String>>,
    fail_listing: bool,
    reject_handle: Option<String>,
}

impl InMemoryPlatform {
    fn with_group(self, org: &str, slug: &str, handles: &str) -> Self {
        self.orgs
            .borrow_mut()
            .entry(org.to_string())
            .or_default()
            .insert(slug.to_string(), handles.split_whitespace().map(str::to_owned).collect());
        self
    }

    fn members(&self, org: &str, slug: &str) -> BTreeSet<String> {
        self.orgs.borrow()[org][slug].clone()
    }

    fn writes(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter(|l| l.starts_with("put") || l.starts_with("delete"))
            .cloned()
            .collect()
    }
}

impl RemotePlatform for InMemoryPlatform {
    fn list_groups(&self, org: &str) -> Result<Vec<RemoteGroup>, PlatformError> {
        self.log.borrow_mut().push(format!("list {org}"));
        if self.fail_listing {
            return Err(PlatformError::Transport("connection reset".to_string()));
        }
        Ok(self
            .orgs
            .borrow()
            .get(org)
            .map(|groups| {
                groups
                    .keys()
                    .map(|slug| RemoteGroup {
                        slug: slug.clone(),
                        name: slug.to_uppercase(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_group_members(&self, org: &str, group: &str) -> Result<Vec<String>, PlatformError> {
        self.log.borrow_mut().push(format!("members {org}/{group}"));
        Ok(self.orgs.borrow()[org][group].iter().cloned().collect())
    }

    fn upsert_membership(
        &self,
        org: &str,
        group: &str,
        handle: &str,
        _role: MembershipRole,
    ) -> Result<(), PlatformError> {
        self.log.borrow_mut().push(format!("put {org}/{group}/{handle}"));
        if self.reject_handle.as_deref() == Some(handle) {
            return Err(PlatformError::Http {
                status: 404,
                body: "Not Found".to_string(),
            });
        }
        self.orgs
            .borrow_mut()
            .get_mut(org)
            .and_then(|groups| groups.get_mut(group))
            .map(|members| members.insert(handle.to_string()));
        Ok(())
    }

    fn remove_membership(&self, org: &str, group: &str, handle: &str) -> Result<(), PlatformError> {
        self.log.borrow_mut().push(format!("delete {org}/{group}/{handle}"));
        self.orgs
            .borrow_mut()
            .get_mut(org)
            .and_then(|groups| groups.get_mut(group))
            .map(|members| members.remove(handle));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn org_access(teams: &[(&str, &str)]) -> OrgAccess {
    let mut org = OrgAccess::default();
    for (slug, handles) in teams {
        let handles: BTreeSet<String> = handles.split_whitespace().map(str::to_owned).collect();
        org.members.extend(handles.iter().cloned());
        org.teams.insert(slug.to_string(), handles);
    }
    org
}

fn set(handles: &str) -> BTreeSet<String> {
    handles.split_whitespace().map(str::to_owned).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn reconciliation_scenario_grants_and_revokes() {
    let platform = InMemoryPlatform::default().with_group("acme", "core", "b c");
    let access = org_access(&[("core", "a b")]);

    let result = commit_org(&platform, "acme", &access, CommitOptions::default()).expect("commit");

    assert_eq!(result.plan.grant, vec![MembershipOp::new("core", "a")]);
    assert_eq!(result.plan.revoke, vec![MembershipOp::new("core", "c")]);
    assert!(result.is_success());
    assert_eq!(platform.members("acme", "core"), set("a b"));
}

#[test]
fn all_reads_happen_before_any_write() {
    let platform = InMemoryPlatform::default()
        .with_group("acme", "core", "b c")
        .with_group("acme", "ops", "x");
    let access = org_access(&[("core", "a"), ("ops", "y")]);

    commit_org(&platform, "acme", &access, CommitOptions::default()).expect("commit");

    let log = platform.log.borrow();
    let last_read = log
        .iter()
        .rposition(|l| l.starts_with("list") || l.starts_with("members"))
        .expect("reads");
    let first_write = log
        .iter()
        .position(|l| l.starts_with("put") || l.starts_with("delete"))
        .expect("writes");
    assert!(last_read < first_write, "log: {log:?}");
}

#[test]
fn missing_group_fails_but_other_groups_are_applied() {
    let platform = InMemoryPlatform::default().with_group("acme", "core", "b");
    let access = org_access(&[("core", "a b"), ("new-team", "a")]);

    let result = commit_org(&platform, "acme", &access, CommitOptions::default()).expect("commit");

    assert_eq!(result.plan.missing_groups, vec!["new-team".to_string()]);
    assert!(!result.is_success());
    assert_eq!(platform.members("acme", "core"), set("a b"));
    let report = result.report.expect("report");
    assert_eq!(report.granted, vec![MembershipOp::new("core", "a")]);
}

#[test]
fn unexpected_group_fails_without_touching_it() {
    let platform = InMemoryPlatform::default()
        .with_group("acme", "core", "a")
        .with_group("acme", "legacy", "z");
    let access = org_access(&[("core", "a")]);

    let result = commit_org(&platform, "acme", &access, CommitOptions::default()).expect("commit");

    assert_eq!(result.plan.unexpected_groups, vec!["legacy".to_string()]);
    assert!(!result.is_success());
    assert!(platform.writes().is_empty());
    assert_eq!(platform.members("acme", "legacy"), set("z"));
}

#[test]
fn second_commit_is_a_noop() {
    let platform = InMemoryPlatform::default().with_group("acme", "core", "b c");
    let access = org_access(&[("core", "a b")]);

    commit_org(&platform, "acme", &access, CommitOptions::default()).expect("first");
    let writes_after_first = platform.writes().len();
    let second = commit_org(&platform, "acme", &access, CommitOptions::default()).expect("second");

    assert!(second.plan.is_noop());
    assert_eq!(platform.writes().len(), writes_after_first);
}

#[test]
fn dry_run_plans_without_writing() {
    let platform = InMemoryPlatform::default().with_group("acme", "core", "b c");
    let access = org_access(&[("core", "a b")]);
    let options = CommitOptions {
        dry_run: true,
        ..CommitOptions::default()
    };

    let result = commit_org(&platform, "acme", &access, options).expect("commit");

    assert!(result.report.is_none());
    assert_eq!(result.plan.grant.len(), 1);
    assert!(platform.writes().is_empty());
    assert_eq!(platform.members("acme", "core"), set("b c"));
}

#[test]
fn rejected_write_is_reported_and_run_continues() {
    let platform = InMemoryPlatform {
        reject_handle: Some("a".to_string()),
        ..InMemoryPlatform::default()
    }
    .with_group("acme", "core", "c");
    let access = org_access(&[("core", "a")]);

    let result = commit_org(&platform, "acme", &access, CommitOptions::default()).expect("commit");

    let report = result.report.as_ref().expect("report");
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.revoked, vec![MembershipOp::new("core", "c")]);
    assert!(!result.is_success());
}

#[test]
fn read_failure_aborts_before_writes() {
    let platform = InMemoryPlatform {
        fail_listing: true,
        ..InMemoryPlatform::default()
    };
    let access = org_access(&[("core", "a")]);

    let err = commit_org(&platform, "acme", &access, CommitOptions::default()).unwrap_err();
    assert!(matches!(err, SyncError::RemoteRead { .. }), "got: {err}");
    assert!(err.to_string().contains("acme"));
    assert!(platform.writes().is_empty());
}

#[test]
fn commit_access_processes_every_org_in_order() {
    let platform = InMemoryPlatform::default()
        .with_group("beta", "core", "")
        .with_group("alpha", "core", "");
    let mut model = AccessModel::default();
    model.github.insert("beta".to_string(), org_access(&[("core", "b")]));
    model.github.insert("alpha".to_string(), org_access(&[("core", "a"), ("gone", "a")]));

    let results = commit_access(&platform, &model, CommitOptions::default()).expect("commit");

    let orgs: Vec<_> = results.iter().map(|r| r.org.as_str()).collect();
    assert_eq!(orgs, vec!["alpha", "beta"]);
    assert!(!results[0].is_success(), "alpha has a missing group");
    assert!(results[1].is_success());
    assert_eq!(platform.members("beta", "core"), set("b"));
}

#[test]
fn handle_casing_differences_cause_no_writes() {
    let platform = InMemoryPlatform::default().with_group("acme", "core", "alice bob");
    let access = org_access(&[("core", "Alice bob")]);

    let first = commit_org(&platform, "acme", &access, CommitOptions::default()).expect("commit");
    assert!(first.plan.is_noop(), "planned {:?}", first.plan);

    commit_org(&platform, "acme", &access, CommitOptions::default()).expect("second commit");
    assert!(platform.writes().is_empty(), "writes: {:?}", platform.writes());
    assert_eq!(platform.members("acme", "core"), set("alice bob"));
}
