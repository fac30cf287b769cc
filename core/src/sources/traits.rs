use serde::{Deserialize, Serialize};

/// The two commits a pull request snapshot is diffed between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub old: String, // Base side: the merge-base or base branch commit
    pub new: String, // Head side: the pull request head commit
}

impl Comparison {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Parse a "base..head" spec.
    pub fn parse(spec: &str) -> Option<Self> {
        let (old, new) = spec.split_once("..")?;
        let new = new.strip_prefix('.').unwrap_or(new);
        if old.is_empty() || new.is_empty() {
            return None;
        }
        Some(Self::new(old, new))
    }

    /// Display form, e.g. "master..feature".
    pub fn key(&self) -> String {
        format!("{}..{}", self.old, self.new)
    }
}

/// What the classifier needs from the repository.
///
/// Both answers are relative to a fixed comparison chosen by the
/// implementation: diffs run between its two commits and existence is
/// checked against the base side.
pub trait DiffSource {
    type Error: std::error::Error;

    /// Unified diff text of one file between base and head.
    fn file_diff(&self, file_path: &str) -> Result<String, Self::Error>;

    /// Whether a file or directory exists on the base side.
    fn exists_in_base(&self, path: &str) -> Result<bool, Self::Error>;
}
