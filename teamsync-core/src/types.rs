//! Domain types for the normalized directory and the computed access model.
//!
//! Maps and sets are ordered (`BTreeMap` / `BTreeSet`) so that persisted
//! artifacts serialize deterministically.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Record id of a person in the source table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Record id of a team in the source table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TeamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TeamId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Record id of a role in the source table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub String);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RoleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoleId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// A person that survived normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    pub chat_handle: String,
    /// Username on the code-hosting platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_handle: Option<String>,
    /// Only set when the person belongs to a team or role with a mailing group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_handle: Option<String>,
}

/// External identifiers a team or role may declare.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalLinks {
    /// Team slug on the code-hosting platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailing_group: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub leads: Vec<PersonId>,
    #[serde(default)]
    pub members: Vec<PersonId>,
    #[serde(flatten)]
    pub links: ExternalLinks,
}

impl Team {
    /// Leads followed by members, without duplicates.
    pub fn everyone(&self) -> impl Iterator<Item = &PersonId> {
        let leads = self.leads.iter();
        let members = self.members.iter().filter(|id| !self.leads.contains(id));
        leads.chain(members)
    }
}

/// A privileged designation (e.g. "admin") held by a flat list of people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub people: Vec<PersonId>,
    #[serde(flatten)]
    pub links: ExternalLinks,
}

/// The normalized, cross-referenced model persisted as `data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub people: BTreeMap<PersonId, Person>,
    #[serde(default)]
    pub teams: BTreeMap<TeamId, Team>,
    #[serde(default)]
    pub roles: BTreeMap<RoleId, Role>,
}

impl Directory {
    pub fn github_handle(&self, id: &PersonId) -> Option<&str> {
        self.people.get(id)?.github_handle.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Access model
// ---------------------------------------------------------------------------

/// Desired state for a single organization on the code-hosting platform.
///
/// Every handle in any `teams` entry is also present in `members`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrgAccess {
    #[serde(default)]
    pub owners: BTreeSet<String>,
    #[serde(default)]
    pub members: BTreeSet<String>,
    /// Team slug → handles.
    #[serde(default)]
    pub teams: BTreeMap<String, BTreeSet<String>>,
}

/// Desired state keyed by platform, then by organization name.
///
/// Persisted as `access.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessModel {
    #[serde(default)]
    pub github: BTreeMap<String, OrgAccess>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
