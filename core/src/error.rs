use serde::Serialize;
use thiserror::Error;

/// Exit status the hosting platform treats as "neutral": neither passed nor
/// failed.
pub const NEUTRAL_EXIT_CODE: u8 = 78;

/// Unified error type for a labeler invocation.
///
/// Serializes to JSON so `--format json` callers get structured failures.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("Git error: {message}")]
    Git { message: String, operation: String },

    #[error("GitHub error: {message}")]
    GitHub { message: String, status: Option<u16> },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl AppError {
    /// Create a Git error with operation context
    pub fn git(message: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::Git {
            message: message.into(),
            operation: operation.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Whether the invocation should end neutrally instead of failing.
    pub fn is_neutral(&self) -> bool {
        match self {
            // Missing token or similar: nothing this pull request did wrong
            Self::Config { .. } => true,
            // Expired token or missing permission should not fail the checks
            Self::GitHub { status, .. } => status.is_some_and(|s| (400..500).contains(&s)),
            Self::Git { .. } | Self::Parse { .. } | Self::Io { .. } => false,
        }
    }

    /// Process exit status for an invocation that ended with this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_neutral() {
            NEUTRAL_EXIT_CODE
        } else {
            1
        }
    }
}

// Convert from LocalGitError
impl From<crate::sources::local_git::LocalGitError> for AppError {
    fn from(err: crate::sources::local_git::LocalGitError) -> Self {
        use crate::sources::local_git::LocalGitError;
        match err {
            LocalGitError::Git(msg) => AppError::git(msg.trim(), "git"),
            LocalGitError::Io(e) => AppError::io(e.to_string()),
            LocalGitError::NotARepo => AppError::git("not a git repository", "open"),
        }
    }
}

// Convert from GitHubError
impl From<crate::sources::github::GitHubError> for AppError {
    fn from(err: crate::sources::github::GitHubError) -> Self {
        AppError::GitHub {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

// Convert from EventError
impl From<crate::event::EventError> for AppError {
    fn from(err: crate::event::EventError) -> Self {
        use crate::event::EventError;
        match err {
            EventError::Io(e) => AppError::io(format!("event file: {e}")),
            EventError::Json(e) => AppError::parse(format!("event payload: {e}")),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}
