//! Labeler library - derives topical labels for pull requests.
//!
//! This crate provides:
//! - The label catalog (`labels`)
//! - Diff classification into labels (`classify`)
//! - Merging derived labels with applied ones (`reconcile`)
//! - Unified diff parsing (`diff`)
//! - Pull request event payloads (`event`)
//! - Git and GitHub access (`sources`)
//!
//! Feature flags:
//! - `cli`: Command-line interface and the `labeler` binary

// Core modules
pub mod classify;
pub mod diff;
pub mod error;
pub mod event;
pub mod labels;
pub mod reconcile;
pub mod sources;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use classify::{classify, LabelSet};
pub use error::AppError;
pub use labels::LabelKey;
pub use reconcile::{reconcile, LabelUpdate};
pub use sources::traits::Comparison;
