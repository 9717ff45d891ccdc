//! The remote platform seam: what the reconciler reads and the executor
//! writes.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlatformError;

/// A group (team) that exists on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteGroup {
    /// Stable identifier used in URLs and in the access model.
    pub slug: String,
    /// Display name, for logs only.
    pub name: String,
}

/// Role granted when adding someone to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Member,
    #[default]
    Maintainer,
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipRole::Member => write!(f, "member"),
            MembershipRole::Maintainer => write!(f, "maintainer"),
        }
    }
}

impl FromStr for MembershipRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "member" => Ok(Self::Member),
            "maintainer" => Ok(Self::Maintainer),
            other => Err(format!(
                "unknown membership role '{other}'; expected: member, maintainer"
            )),
        }
    }
}

/// Group membership as read from (or written to) a code-hosting platform.
///
/// Implementations must return complete listings, following pagination.
pub trait RemotePlatform {
    fn list_groups(&self, org: &str) -> Result<Vec<RemoteGroup>, PlatformError>;

    fn list_group_members(&self, org: &str, group: &str) -> Result<Vec<String>, PlatformError>;

    /// Add `handle` to `group`, or update their role if already present.
    fn upsert_membership(
        &self,
        org: &str,
        group: &str,
        handle: &str,
        role: MembershipRole,
    ) -> Result<(), PlatformError>;

    fn remove_membership(&self, org: &str, group: &str, handle: &str)
        -> Result<(), PlatformError>;
}

/// Live membership of every group in one organization: slug → handles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteState {
    pub groups: BTreeMap<String, BTreeSet<String>>,
}

impl RemoteState {
    pub fn group(&self, slug: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(slug)
    }
}

impl FromIterator<(String, BTreeSet<String>)> for RemoteState {
    fn from_iter<I: IntoIterator<Item = (String, BTreeSet<String>)>>(iter: I) -> Self {
        Self {
            groups: iter.into_iter().collect(),
        }
    }
}

/// List every group in `org` and every group's members.
///
/// Completes all reads before returning; nothing is written.
pub fn read_remote_state(
    platform: &impl RemotePlatform,
    org: &str,
) -> Result<RemoteState, PlatformError> {
    let mut state = RemoteState::default();
    for group in platform.list_groups(org)? {
        tracing::info!("getting members for team: {}", group.name);
        let members = platform.list_group_members(org, &group.slug)?;
        state.groups.insert(group.slug, members.into_iter().collect());
    }
    Ok(state)
}
