//! Property tests for the reconciler: set-difference correctness and
//! idempotence over arbitrary desired/current group states.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;
use teamsync_sync::{reconcile, RemoteState};

fn handles() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-f]", 0..6)
}

fn groups() -> impl Strategy<Value = BTreeMap<String, BTreeSet<String>>> {
    prop::collection::btree_map("(core|ops|web|docs|infra)", handles(), 0..5)
}

fn members_of<'a>(
    ops: impl Iterator<Item = &'a teamsync_sync::MembershipOp>,
    group: &str,
) -> BTreeSet<String> {
    ops.filter(|op| op.group == group)
        .map(|op| op.handle.clone())
        .collect()
}

#[test]
fn prop_grant_and_revoke_are_set_differences() {
    proptest!(|(desired in groups(), current in groups())| {
        let state: RemoteState = current.clone().into_iter().collect();
        let plan = reconcile(&desired, &state);

        for (slug, d) in &desired {
            let Some(c) = current.get(slug) else { continue };
            let grant = members_of(plan.grant.iter(), slug);
            let revoke = members_of(plan.revoke.iter(), slug);

            prop_assert_eq!(&grant, &d.difference(c).cloned().collect::<BTreeSet<_>>());
            prop_assert_eq!(&revoke, &c.difference(d).cloned().collect::<BTreeSet<_>>());

            // D = (C \ revoke) ∪ grant
            let rebuilt: BTreeSet<String> = c
                .difference(&revoke)
                .cloned()
                .chain(grant.iter().cloned())
                .collect();
            prop_assert_eq!(&rebuilt, d);
        }
    });
}

#[test]
fn prop_reconcile_is_idempotent() {
    proptest!(|(desired in groups(), current in groups())| {
        let state: RemoteState = current.into_iter().collect();
        let plan = reconcile(&desired, &state);
        let converged = plan.apply_to(&state);

        let second = reconcile(&desired, &converged);
        prop_assert!(second.is_noop(), "second pass planned {:?}", second);
        prop_assert_eq!(&second.missing_groups, &plan.missing_groups);
        prop_assert_eq!(&second.unexpected_groups, &plan.unexpected_groups);
    });
}

#[test]
fn prop_mismatch_lists_partition_group_ids() {
    proptest!(|(desired in groups(), current in groups())| {
        let state: RemoteState = current.clone().into_iter().collect();
        let plan = reconcile(&desired, &state);

        for slug in &plan.missing_groups {
            prop_assert!(desired.contains_key(slug) && !current.contains_key(slug));
        }
        for slug in &plan.unexpected_groups {
            prop_assert!(current.contains_key(slug) && !desired.contains_key(slug));
        }
        for op in plan.grant.iter().chain(plan.revoke.iter()) {
            prop_assert!(desired.contains_key(&op.group) && current.contains_key(&op.group));
        }
    });
}

#[test]
fn prop_handle_case_is_ignored() {
    proptest!(|(desired in groups())| {
        let shouted: RemoteState = desired
            .iter()
            .map(|(slug, handles)| {
                (slug.clone(), handles.iter().map(|h| h.to_uppercase()).collect::<BTreeSet<_>>())
            })
            .collect();
        let plan = reconcile(&desired, &shouted);
        prop_assert!(plan.is_noop(), "planned {:?}", plan);
        prop_assert!(!plan.has_structural_mismatch());
    });
}
