//! Access calculator: derives the desired [`AccessModel`] from a [`Directory`].
//!
//! Pure function of its inputs. Sets are ordered, so the same directory
//! always yields byte-identical `access.json`.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{AccessModel, Directory, OrgAccess, RoleId};

/// Group that always mirrors the full member set. Reserved: a team using
/// this slug is overwritten.
pub const EVERYONE_GROUP: &str = "everyone";

/// Record id of the administrative role in the reference deployment.
pub const DEFAULT_ADMIN_ROLE: &str = "recKtqyWh7bsEElpE";

/// Organization that receives the computed access by default.
pub const DEFAULT_ORG: &str = "reach4help";

/// Inputs to [`calculate_access`] besides the directory itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessConfig {
    /// Holders of this role become organization owners.
    pub admin_role: RoleId,
    /// Organization name the access model is keyed under.
    pub org: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_role: RoleId::from(DEFAULT_ADMIN_ROLE),
            org: DEFAULT_ORG.to_string(),
        }
    }
}

/// Compute the access model for the configured organization.
pub fn calculate_access(directory: &Directory, config: &AccessConfig) -> AccessModel {
    let org = calculate_org_access(directory, &config.admin_role);
    AccessModel {
        github: BTreeMap::from([(config.org.clone(), org)]),
    }
}

/// Compute owners, members and team rosters for a single organization.
pub fn calculate_org_access(directory: &Directory, admin_role: &RoleId) -> OrgAccess {
    let mut access = OrgAccess::default();

    match directory.roles.get(admin_role) {
        Some(role) => {
            access.owners = role
                .people
                .iter()
                .filter_map(|id| directory.github_handle(id))
                .map(str::to_owned)
                .collect();
        }
        None => tracing::warn!("admin role {admin_role} not found; no owners computed"),
    }

    for team in directory.teams.values() {
        let roster: BTreeSet<String> = team
            .everyone()
            .filter_map(|id| directory.github_handle(id))
            .map(str::to_owned)
            .collect();
        access.members.extend(roster.iter().cloned());

        if let Some(slug) = &team.links.github_team {
            access.teams.entry(slug.clone()).or_default().extend(roster);
        }
    }

    if access.teams.contains_key(EVERYONE_GROUP) {
        tracing::warn!("a team uses the reserved slug '{EVERYONE_GROUP}'; it will mirror all members");
    }
    access
        .teams
        .insert(EVERYONE_GROUP.to_string(), access.members.clone());

    access
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
