//! GitHub provider abstraction.
//!
//! Defines a trait for writing pull request labels and a concrete
//! implementation backed by the REST API.

use crate::reconcile::LabelUpdate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("labeler/", env!("CARGO_PKG_VERSION"));

/// Owner/name pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Serialize)]
struct LabelsBody<'a> {
    labels: &'a [String],
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Label writes against a pull request's issue.
pub trait GitHubProvider {
    type Error: std::error::Error;

    /// Add labels, keeping the ones already applied.
    fn add_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), Self::Error>;

    /// Replace every label with `labels`.
    fn replace_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), Self::Error>;

    fn apply(
        &self,
        repo: &RepoRef,
        number: u64,
        update: &LabelUpdate,
    ) -> Result<(), Self::Error> {
        match update {
            LabelUpdate::Add(labels) => self.add_labels(repo, number, labels),
            LabelUpdate::Replace(labels) => self.replace_labels(repo, number, labels),
        }
    }
}

// ---------------------------------------------------------------------------
// RestClient
// ---------------------------------------------------------------------------

/// [`GitHubProvider`] backed by the v3 REST API. Requests are sent once;
/// there are no retries.
pub struct RestClient {
    api_url: String,
    token: String,
}

impl RestClient {
    pub fn new(api_url: &str, token: impl Into<String>) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.into(),
        }
    }

    fn labels_url(&self, repo: &RepoRef, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{number}/labels",
            self.api_url, repo.owner, repo.name
        )
    }

    fn send(&self, method: Method, url: &str, labels: &[String]) -> Result<(), GitHubError> {
        log::debug!("[github] {method:?} {url} {labels:?}");
        let request = match method {
            Method::Post => ureq::post(url),
            Method::Put => ureq::put(url),
        };
        let response = request
            .header("Accept", "application/vnd.github+json")
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .config()
            .http_status_as_error(false)
            .build()
            .send_json(&LabelsBody { labels })
            .map_err(|e| GitHubError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let message = response.into_body().read_to_string().unwrap_or_default();
        Err(GitHubError::Status { status, message })
    }
}

#[derive(Debug, Clone, Copy)]
enum Method {
    Post,
    Put,
}

impl GitHubProvider for RestClient {
    type Error = GitHubError;

    fn add_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        self.send(Method::Post, &self.labels_url(repo, number), labels)
    }

    fn replace_labels(
        &self,
        repo: &RepoRef,
        number: u64,
        labels: &[String],
    ) -> Result<(), GitHubError> {
        self.send(Method::Put, &self.labels_url(repo, number), labels)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("GitHub request failed: {0}")]
    Transport(String),
}

impl GitHubError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }
}
