//! End-to-end: raw records → normalize → calculate_access.

use std::collections::BTreeSet;

use serde_json::{json, Value};
use teamsync_core::{
    calculate_access, normalize, records::RawFields, store, AccessConfig, RawRecords, RoleId,
    EVERYONE_GROUP,
};

fn fields(value: Value) -> RawFields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn config() -> AccessConfig {
    AccessConfig {
        admin_role: RoleId::from("recAdmin"),
        org: "reach4help".to_string(),
    }
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn scenario() -> RawRecords {
    let mut raw = RawRecords::default();
    raw.people.insert(
        "recA".into(),
        fields(json!({ "Slack Handle": "alice", "GitHub Handle": "a" })),
    );
    raw.people.insert(
        "recB".into(),
        fields(json!({ "Slack Handle": "bob", "GitHub Handle": "b" })),
    );
    raw.roles.insert(
        "recAdmin".into(),
        fields(json!({ "Name": "Admin", "People": ["recA"] })),
    );
    raw.teams.insert(
        "recT".into(),
        fields(json!({ "Name": "Core", "GitHub Team": "core", "Leads": ["recA"], "Members": ["recB"] })),
    );
    raw
}

#[test]
fn admin_and_single_team_scenario() {
    let access = calculate_access(&normalize(&scenario()), &config());

    let json = serde_json::to_value(&access).expect("serialize");
    assert_eq!(
        json,
        json!({
            "github": {
                "reach4help": {
                    "owners": ["a"],
                    "members": ["a", "b"],
                    "teams": {
                        "core": ["a", "b"],
                        "everyone": ["a", "b"],
                    }
                }
            }
        })
    );
}

#[test]
fn everyone_slug_is_reserved() {
    let mut raw = scenario();
    raw.people.insert(
        "recC".into(),
        fields(json!({ "Slack Handle": "carol", "GitHub Handle": "c" })),
    );
    raw.teams.insert(
        "recImpostor".into(),
        fields(json!({ "Name": "Impostor", "GitHub Team": "everyone", "Members": ["recC"] })),
    );

    let access = calculate_access(&normalize(&raw), &config());
    let org = &access.github["reach4help"];
    assert_eq!(org.members, set(&["a", "b", "c"]));
    assert_eq!(org.teams[EVERYONE_GROUP], org.members);
}

#[test]
fn people_without_handle_are_skipped_silently() {
    let mut raw = scenario();
    raw.people.insert("recN".into(), fields(json!({ "Slack Handle": "nohandle" })));
    raw.teams.insert(
        "recOps".into(),
        fields(json!({ "Name": "Ops", "GitHub Team": "ops", "Members": ["recN", "recB"] })),
    );

    let access = calculate_access(&normalize(&raw), &config());
    let org = &access.github["reach4help"];
    assert_eq!(org.teams["ops"], set(&["b"]));
    assert_eq!(org.members, set(&["a", "b"]));
}

#[test]
fn persisted_artifacts_are_stable_across_runs() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let directory = normalize(&scenario());
    store::save_directory_at(home.path(), &directory).expect("save data");

    let loaded = store::load_directory_at(home.path()).expect("load data");
    assert_eq!(loaded, directory);

    let access = calculate_access(&loaded, &config());
    let first = store::save_access_at(home.path(), &access).expect("save access");
    let second = store::save_access_at(home.path(), &calculate_access(&loaded, &config()))
        .expect("save access again");
    assert!(matches!(first, store::WriteResult::Written { .. }));
    assert!(matches!(second, store::WriteResult::Unchanged { .. }));
}
