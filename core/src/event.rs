//! Pull request event payload, as delivered by the hosting automation
//! platform. Only the fields the labeler reads are modelled.

use crate::sources::github::RepoRef;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("cannot read event file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed event payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestEvent {
    pub action: String,
    pub number: u64,
    pub pull_request: PullRequest,
    pub repository: Repository,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub head: GitRef,
    pub base: GitRef,
    #[serde(default)]
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub sha: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    pub login: String,
}

impl PullRequestEvent {
    pub fn from_path(path: &Path) -> Result<Self, EventError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn from_json(json: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Only newly opened pull requests and new pushes are labeled.
    pub fn is_relevant(&self) -> bool {
        matches!(self.action.as_str(), "opened" | "synchronize")
    }

    pub fn repo(&self) -> RepoRef {
        RepoRef::new(&self.repository.owner.login, &self.repository.name)
    }

    /// Label names at the time the event fired, in payload order.
    pub fn current_labels(&self) -> Vec<String> {
        self.pull_request
            .labels
            .iter()
            .map(|l| l.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "action": "synchronize",
        "number": 9876,
        "pull_request": {
            "number": 9876,
            "title": "feat(git): add gswc alias",
            "head": { "ref": "feature/gswc", "sha": "1111111111111111111111111111111111111111" },
            "base": { "ref": "master", "sha": "2222222222222222222222222222222222222222" },
            "labels": [
                { "id": 1, "name": "Plugin: git", "color": "ededed" },
                { "id": 2, "name": "Status: conflicts", "color": "b60205" }
            ]
        },
        "repository": { "name": "ohmyzsh", "owner": { "login": "ohmyzsh" } }
    }"#;

    #[test]
    fn test_parse_sample_event() {
        let event = PullRequestEvent::from_json(SAMPLE).unwrap();
        assert!(event.is_relevant());
        assert_eq!(event.number, 9876);
        assert_eq!(event.pull_request.head.name, "feature/gswc");
        assert_eq!(event.pull_request.base.name, "master");
        assert_eq!(event.repo(), RepoRef::new("ohmyzsh", "ohmyzsh"));
        assert_eq!(
            event.current_labels(),
            vec!["Plugin: git", "Status: conflicts"]
        );
    }

    #[test]
    fn test_other_actions_are_irrelevant() {
        let json = SAMPLE.replace("synchronize", "labeled");
        let event = PullRequestEvent::from_json(&json).unwrap();
        assert!(!event.is_relevant());
    }

    #[test]
    fn test_missing_labels_default_to_empty() {
        let json = r#"{
            "action": "opened",
            "number": 1,
            "pull_request": {
                "number": 1,
                "head": { "ref": "a", "sha": "a" },
                "base": { "ref": "b", "sha": "b" }
            },
            "repository": { "name": "r", "owner": { "login": "o" } }
        }"#;
        let event = PullRequestEvent::from_json(json).unwrap();
        assert!(event.current_labels().is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        let err = PullRequestEvent::from_json(r#"{"action": "opened"}"#).unwrap_err();
        assert!(matches!(err, EventError::Json(_)));
    }
}
