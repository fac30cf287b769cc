pub mod rules;

use crate::diff::parser::parse_diff;
use crate::labels::LabelKey;
use crate::sources::traits::DiffSource;
use serde::Serialize;
use std::collections::BTreeSet;

/// Labels derived for one pull request snapshot.
///
/// Iteration follows catalog order, so output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeSet<LabelKey>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: LabelKey) -> bool {
        self.0.insert(label)
    }

    pub fn contains(&self, label: LabelKey) -> bool {
        self.0.contains(&label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = LabelKey> + '_ {
        self.0.iter().copied()
    }

    pub fn display_names(&self) -> Vec<String> {
        self.iter().map(|l| l.display_name().to_owned()).collect()
    }
}

impl Extend<LabelKey> for LabelSet {
    fn extend<I: IntoIterator<Item = LabelKey>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<LabelKey> for LabelSet {
    fn from_iter<I: IntoIterator<Item = LabelKey>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Derive labels from the changed files of a pull request.
///
/// Every rule runs independently and only ever adds to the result. Diffs are
/// fetched only for `.zsh` files, existence checks only once per plugin or
/// theme name. Errors from `source` abort classification.
pub fn classify<S: DiffSource>(
    changed_files: &[String],
    source: &S,
) -> Result<LabelSet, S::Error> {
    let files: BTreeSet<&str> = changed_files.iter().map(String::as_str).collect();
    let mut labels = LabelSet::new();

    let mut plugins = BTreeSet::new();
    let mut themes = BTreeSet::new();

    for &path in &files {
        if rules::is_core(path) {
            labels.insert(LabelKey::Core);
        }
        if let Some(name) = rules::plugin_name(path) {
            plugins.insert(name);
        }
        if let Some(name) = rules::theme_name(path) {
            themes.insert(name);
        }
        if let Some(label) = rules::path_label(path) {
            log::debug!("[classify] {path}: {}", label.key());
            labels.insert(label);
        }
        if rules::needs_content_scan(path) {
            let diff = source.file_diff(path)?;
            labels.extend(rules::content_labels(&parse_diff(&diff, path)));
        }
        if rules::is_completion(path) {
            labels.insert(LabelKey::Completion);
        }
    }

    if !plugins.is_empty() {
        labels.insert(LabelKey::Plugin);
    }
    for name in plugins {
        if !source.exists_in_base(&rules::plugin_dir(name))? {
            log::debug!("[classify] plugin {name} is new");
            labels.insert(LabelKey::NewPlugin);
        }
    }

    if !themes.is_empty() {
        labels.insert(LabelKey::Theme);
    }
    for name in themes {
        if !source.exists_in_base(&rules::theme_file(name))? {
            log::debug!("[classify] theme {name} is new");
            labels.insert(LabelKey::NewTheme);
        }
    }

    log::info!(
        "[classify] {} file(s) -> {} label(s)",
        files.len(),
        labels.len()
    );
    Ok(labels)
}
