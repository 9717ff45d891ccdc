//! GitHub organization teams as a [`RemotePlatform`].
//!
//! Listings page through `per_page` / `page` until a short page comes back,
//! so teams with more than one page of members are read completely.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use teamsync_sync::{MembershipRole, PlatformError, RemoteGroup, RemotePlatform};

use crate::config::GitHubConfig;
use crate::error::HttpError;
use crate::http;

/// Largest page GitHub serves for these endpoints.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct TeamItem {
    slug: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserItem {
    login: String,
}

/// Blocking client for the GitHub REST API.
pub struct GitHubClient {
    agent: ureq::Agent,
    config: GitHubConfig,
    page_size: usize,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Self {
        Self {
            agent: http::agent(),
            config,
            page_size: MAX_PAGE_SIZE,
        }
    }

    /// Override the listing page size (1..=100).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        self.agent
            .request(method, &http::join_url(&self.config.api_url, path))
            .set("Authorization", &format!("Bearer {}", self.config.token))
            .set("Accept", "application/vnd.github+json")
            .set("X-GitHub-Api-Version", "2022-11-28")
    }

    /// GET every page of a list endpoint.
    fn get_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, HttpError> {
        let per_page = self.page_size.to_string();
        let mut items = Vec::new();
        let mut page = 1usize;
        loop {
            let batch: Vec<T> = http::get_json(
                self.request("GET", path)
                    .query("per_page", &per_page)
                    .query("page", &page.to_string()),
            )?;
            let short = batch.len() < self.page_size;
            items.extend(batch);
            if short {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

fn teams_path(org: &str) -> String {
    format!("orgs/{}/teams", urlencoding::encode(org))
}

fn team_path(org: &str, group: &str) -> String {
    format!("{}/{}", teams_path(org), urlencoding::encode(group))
}

fn membership_path(org: &str, group: &str, handle: &str) -> String {
    format!(
        "{}/memberships/{}",
        team_path(org, group),
        urlencoding::encode(handle)
    )
}

impl RemotePlatform for GitHubClient {
    fn list_groups(&self, org: &str) -> Result<Vec<RemoteGroup>, PlatformError> {
        let teams: Vec<TeamItem> = self.get_all(&teams_path(org))?;
        Ok(teams
            .into_iter()
            .map(|t| RemoteGroup {
                slug: t.slug,
                name: t.name,
            })
            .collect())
    }

    fn list_group_members(&self, org: &str, group: &str) -> Result<Vec<String>, PlatformError> {
        let users: Vec<UserItem> = self.get_all(&format!("{}/members", team_path(org, group)))?;
        Ok(users.into_iter().map(|u| u.login).collect())
    }

    fn upsert_membership(
        &self,
        org: &str,
        group: &str,
        handle: &str,
        role: MembershipRole,
    ) -> Result<(), PlatformError> {
        let result = self
            .request("PUT", &membership_path(org, group, handle))
            .send_json(json!({ "role": role.to_string() }));
        http::check(result)?;
        Ok(())
    }

    fn remove_membership(&self, org: &str, group: &str, handle: &str) -> Result<(), PlatformError> {
        let result = self
            .request("DELETE", &membership_path(org, group, handle))
            .call();
        http::check(result)?;
        Ok(())
    }
}
