//! Raw source records and the normalizer that turns them into a [`Directory`].
//!
//! Raw records arrive as field bags keyed by column name, straight from the
//! record store. Every bag goes through [`FieldBag::from_raw`] before any
//! field is read, so "absent", `null`, blank strings and empty lists all mean
//! the same thing: not set.
//!
//! Normalization rules:
//!
//! 1. Teams and roles without a name are dropped.
//! 2. A person is kept only if an included team or role references them and
//!    they have a chat handle.
//! 3. Email addresses are kept only for people in at least one team or role
//!    that declares a mailing group.
//! 4. Team and role id lists are pruned to people present in the output.
//!
//! Nothing here fails: malformed records are dropped and logged at debug.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Directory, ExternalLinks, Person, PersonId, Role, RoleId, Team, TeamId};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const PEOPLE_TABLE: &str = "People";
pub const TEAMS_TABLE: &str = "Teams";
pub const ROLES_TABLE: &str = "Roles";

const PERSON_CHAT_HANDLE: &str = "Slack Handle";
const PERSON_GITHUB_HANDLE: &str = "GitHub Handle";
const PERSON_EMAIL: &str = "Email Address";
const PERSON_OFFICIAL_HANDLE: &str = "Official Handle";

const NAME: &str = "Name";
const TEAM_LEADS: &str = "Leads";
const TEAM_MEMBERS: &str = "Members";
const ROLE_PEOPLE: &str = "People";
const GITHUB_TEAM: &str = "GitHub Team";
const SLACK_CHANNEL: &str = "Slack Channel";
const MAILING_GROUP: &str = "Google Group";

// ---------------------------------------------------------------------------
// Raw records
// ---------------------------------------------------------------------------

/// Column name → cell value, exactly as the record store returned it.
pub type RawFields = serde_json::Map<String, Value>;

/// Record id → fields for one table.
pub type RawTable = BTreeMap<String, RawFields>;

/// The three source tables, fully materialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecords {
    #[serde(default)]
    pub people: RawTable,
    #[serde(default)]
    pub teams: RawTable,
    #[serde(default)]
    pub roles: RawTable,
}

// ---------------------------------------------------------------------------
// FieldBag
// ---------------------------------------------------------------------------

/// A field bag holding only the fields that are actually set.
///
/// Strings are trimmed; blank strings, `null` and lists without any
/// non-blank string are removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldBag(BTreeMap<String, Value>);

impl FieldBag {
    pub fn from_raw(raw: &RawFields) -> Self {
        let fields = raw
            .iter()
            .filter_map(|(key, value)| normalize_value(value).map(|v| (key.clone(), v)))
            .collect();
        Self(fields)
    }

    /// A single text value. Lists yield their first entry.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// A list of linked record ids. A bare string counts as a one-item list.
    pub fn links(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            Some(Value::String(s)) => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

fn normalize_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_owned()))
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(_) => normalize_value(item),
                    Value::Null => None,
                    other => Some(other.clone()),
                })
                .collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        other => Some(other.clone()),
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// Build the normalized [`Directory`] from raw tables.
pub fn normalize(raw: &RawRecords) -> Directory {
    let mut teams: BTreeMap<TeamId, Team> = raw
        .teams
        .iter()
        .filter_map(|(id, fields)| parse_team(id, &FieldBag::from_raw(fields)))
        .map(|team| (team.id.clone(), team))
        .collect();

    let mut roles: BTreeMap<RoleId, Role> = raw
        .roles
        .iter()
        .filter_map(|(id, fields)| parse_role(id, &FieldBag::from_raw(fields)))
        .map(|role| (role.id.clone(), role))
        .collect();

    let mut referenced = BTreeSet::new();
    let mut on_mailing_list = BTreeSet::new();
    for team in teams.values() {
        for id in team.everyone() {
            referenced.insert(id.clone());
            if team.links.mailing_group.is_some() {
                on_mailing_list.insert(id.clone());
            }
        }
    }
    for role in roles.values() {
        for id in &role.people {
            referenced.insert(id.clone());
            if role.links.mailing_group.is_some() {
                on_mailing_list.insert(id.clone());
            }
        }
    }

    let people: BTreeMap<PersonId, Person> = referenced
        .into_iter()
        .filter_map(|id| {
            let Some(fields) = raw.people.get(&id.0) else {
                tracing::debug!("ignoring reference to unknown person {id}");
                return None;
            };
            let include_email = on_mailing_list.contains(&id);
            parse_person(id, &FieldBag::from_raw(fields), include_email)
        })
        .map(|person| (person.id.clone(), person))
        .collect();

    for team in teams.values_mut() {
        team.leads.retain(|id| people.contains_key(id));
        team.members.retain(|id| people.contains_key(id));
    }
    for role in roles.values_mut() {
        role.people.retain(|id| people.contains_key(id));
    }

    tracing::info!(
        "normalized {} people, {} teams, {} roles (from {} / {} / {} records)",
        people.len(),
        teams.len(),
        roles.len(),
        raw.people.len(),
        raw.teams.len(),
        raw.roles.len(),
    );

    Directory {
        people,
        teams,
        roles,
    }
}

fn parse_team(id: &str, fields: &FieldBag) -> Option<Team> {
    let Some(name) = fields.text(NAME) else {
        tracing::debug!("dropping team {id}: missing name");
        return None;
    };
    Some(Team {
        id: TeamId::from(id),
        name: name.to_owned(),
        leads: person_ids(fields.links(TEAM_LEADS)),
        members: person_ids(fields.links(TEAM_MEMBERS)),
        links: parse_links(fields),
    })
}

fn parse_role(id: &str, fields: &FieldBag) -> Option<Role> {
    let Some(name) = fields.text(NAME) else {
        tracing::debug!("dropping role {id}: missing name");
        return None;
    };
    Some(Role {
        id: RoleId::from(id),
        name: name.to_owned(),
        people: person_ids(fields.links(ROLE_PEOPLE)),
        links: parse_links(fields),
    })
}

fn parse_person(id: PersonId, fields: &FieldBag, include_email: bool) -> Option<Person> {
    let Some(chat_handle) = fields.text(PERSON_CHAT_HANDLE) else {
        tracing::debug!("dropping person {id}: missing chat handle");
        return None;
    };
    let email_address = if include_email {
        fields.text(PERSON_EMAIL).map(str::to_owned)
    } else {
        None
    };
    Some(Person {
        id,
        chat_handle: chat_handle.to_owned(),
        github_handle: fields.text(PERSON_GITHUB_HANDLE).map(str::to_owned),
        email_address,
        official_handle: fields.text(PERSON_OFFICIAL_HANDLE).map(str::to_owned),
    })
}

fn parse_links(fields: &FieldBag) -> ExternalLinks {
    ExternalLinks {
        github_team: fields.text(GITHUB_TEAM).map(str::to_owned),
        slack_channel: fields.text(SLACK_CHANNEL).map(str::to_owned),
        mailing_group: fields.text(MAILING_GROUP).map(str::to_owned),
    }
}

/// Order-preserving dedup.
fn person_ids(raw: Vec<String>) -> Vec<PersonId> {
    let mut seen = BTreeSet::new();
    raw.into_iter()
        .filter(|id| seen.insert(id.clone()))
        .map(PersonId::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
