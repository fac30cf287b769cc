//! Merge derived labels with the labels a pull request already carries.
//!
//! Labels only ever accumulate, with one exception: once a conflict is
//! resolved the conflict marker has to go, and the issues API can only drop
//! a label by replacing the whole set. A derived label that stops applying on
//! a later push is therefore never removed.

use crate::classify::LabelSet;
use crate::labels::LabelKey;
use serde::Serialize;

/// The label write to perform against the issues API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "labels", rename_all = "lowercase")]
pub enum LabelUpdate {
    /// Add these labels, leaving all others in place.
    Add(Vec<String>),
    /// Replace the full label set with these.
    Replace(Vec<String>),
}

impl LabelUpdate {
    pub fn labels(&self) -> &[String] {
        match self {
            Self::Add(labels) | Self::Replace(labels) => labels,
        }
    }

    pub fn is_replace(&self) -> bool {
        matches!(self, Self::Replace(_))
    }
}

/// Decide what to write for one pull request snapshot.
///
/// Returns `None` when nothing needs to be sent.
pub fn reconcile(
    derived: &LabelSet,
    conflict_detected: bool,
    current: &[String],
) -> Option<LabelUpdate> {
    let conflicts = LabelKey::Conflicts.display_name();

    let mut labels = derived.display_names();
    let replace = if conflict_detected {
        push_unique(&mut labels, conflicts);
        false
    } else {
        current.iter().any(|l| l == conflicts)
    };

    if replace {
        for label in current.iter().filter(|l| *l != conflicts) {
            push_unique(&mut labels, label);
        }
    } else {
        labels.retain(|l| !current.contains(l));
    }

    // An empty replace would clear the conflict marker, but an empty write is
    // never sent. The marker then stays until the next push derives a label.
    if labels.is_empty() {
        log::info!("[reconcile] no labels to write");
        return None;
    }
    if replace {
        log::info!("[reconcile] conflicts resolved, replacing labels");
        Some(LabelUpdate::Replace(labels))
    } else {
        Some(LabelUpdate::Add(labels))
    }
}

fn push_unique(labels: &mut Vec<String>, label: &str) {
    if !labels.iter().any(|l| l == label) {
        labels.push(label.to_owned());
    }
}
