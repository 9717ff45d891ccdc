//! Blocking HTTP plumbing shared by the Airtable and GitHub clients.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::HttpError;

pub(crate) const USER_AGENT: &str = concat!("teamsync/", env!("CARGO_PKG_VERSION"));

const TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
}

/// Map ureq's error split (status vs. transport) onto [`HttpError`].
pub(crate) fn check(result: Result<ureq::Response, ureq::Error>) -> Result<ureq::Response, HttpError> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(status, response)) => Err(HttpError::Status {
            status,
            body: response.into_string().unwrap_or_default(),
        }),
        Err(ureq::Error::Transport(transport)) => Err(HttpError::Transport(transport.to_string())),
    }
}

/// Send `request` and decode a JSON body.
pub(crate) fn get_json<T: DeserializeOwned>(request: ureq::Request) -> Result<T, HttpError> {
    check(request.call())?
        .into_json()
        .map_err(|e| HttpError::Decode(e.to_string()))
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
