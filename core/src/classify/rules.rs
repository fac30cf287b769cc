//! Path and content rules that map a changed file to labels.
//!
//! Path rules are pure string matching. Content rules look at the added and
//! removed lines of a file's diff; they never see header or context lines.

use crate::diff::parser::DiffHunk;
use crate::labels::LabelKey;
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::sync::LazyLock;

/// `*` stops at `/`, so `lib/*` only matches immediate children.
const NON_RECURSIVE: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

// --- Area rules ---

static CORE_PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    ["lib/*", "tools/*"]
        .iter()
        .map(|p| Pattern::new(p).unwrap())
        .collect()
});

/// `lib/*` or `tools/*`, immediate children only.
pub fn is_core(path: &str) -> bool {
    CORE_PATTERNS
        .iter()
        .any(|p| p.matches_with(path, NON_RECURSIVE))
}

/// Plugin directory name for `plugins/<name>/...`.
pub fn plugin_name(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("plugins/")?;
    let (name, file) = rest.split_once('/')?;
    if name.is_empty() || file.is_empty() {
        return None;
    }
    Some(name)
}

/// Theme name for `themes/<name>.zsh-theme`.
pub fn theme_name(path: &str) -> Option<&str> {
    let name = path
        .strip_prefix("themes/")?
        .strip_suffix(".zsh-theme")?;
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}

pub fn plugin_dir(name: &str) -> String {
    format!("plugins/{name}")
}

pub fn theme_file(name: &str) -> String {
    format!("themes/{name}.zsh-theme")
}

// --- Per-path table (first match wins) ---

static PATH_RULES: LazyLock<Vec<(Pattern, LabelKey)>> = LazyLock::new(|| {
    [
        ("oh-my-zsh.sh", LabelKey::Init),
        ("oh-my-zsh..zsh", LabelKey::Init),
        ("tools/*upgrade.sh", LabelKey::Update),
        ("tools/install.sh", LabelKey::Install),
        ("tools/uninstall.sh", LabelKey::Uninstall),
        ("plugins/aws/*", LabelKey::PluginAws),
        ("plugins/git/*", LabelKey::PluginGit),
        ("plugins/mercurial/*", LabelKey::PluginMercurial),
        ("plugins/tmux/*", LabelKey::PluginTmux),
    ]
    .into_iter()
    .map(|(p, label)| (Pattern::new(p).unwrap(), label))
    .collect()
});

pub fn path_label(path: &str) -> Option<LabelKey> {
    PATH_RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(path))
        .map(|(_, label)| *label)
}

// --- Content rules ---

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#?\s*alias\s+\S").unwrap());
static BINDKEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#?\s*bindkey\s+\S").unwrap());

pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Files whose diff is scanned for alias/bindkey changes.
pub fn needs_content_scan(path: &str) -> bool {
    file_name(path).ends_with(".zsh")
}

/// Completion definitions are named `_<command>`.
pub fn is_completion(path: &str) -> bool {
    file_name(path).starts_with('_')
}

/// Topic labels implied by the changed lines of a diff.
pub fn content_labels(hunks: &[DiffHunk]) -> Vec<LabelKey> {
    let mut alias = false;
    let mut bindkey = false;

    for hunk in hunks {
        for line in hunk.changed_lines() {
            let line_no = line.line_number().unwrap_or_default();
            if !alias && ALIAS_RE.is_match(&line.content) {
                log::debug!("[classify] {}:{line_no}: alias", hunk.file_path);
                alias = true;
            }
            if !bindkey && BINDKEY_RE.is_match(&line.content) {
                log::debug!("[classify] {}:{line_no}: bindkey", hunk.file_path);
                bindkey = true;
            }
        }
    }

    let mut labels = Vec::new();
    if alias {
        labels.push(LabelKey::Alias);
    }
    if bindkey {
        labels.push(LabelKey::Bindkey);
    }
    labels
}
