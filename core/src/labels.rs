//! Label catalog: the fixed set of labels the classifier can emit and the
//! display strings they are published under.

use serde::{Serialize, Serializer};
use std::fmt;

/// Symbolic identifier for a label.
///
/// Declaration order is the order labels are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelKey {
    Core,
    Init,
    Install,
    Update,
    Plugin,
    Theme,
    Uninstall,
    NewPlugin,
    NewTheme,
    PluginAws,
    PluginGit,
    PluginMercurial,
    PluginTmux,
    Alias,
    Bindkey,
    Completion,
    Conflicts,
}

impl LabelKey {
    /// Short key used in logs and JSON output (e.g. `plugin_aws`).
    pub fn key(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Init => "init",
            Self::Install => "install",
            Self::Update => "update",
            Self::Plugin => "plugin",
            Self::Theme => "theme",
            Self::Uninstall => "uninstall",
            Self::NewPlugin => "new_plugin",
            Self::NewTheme => "new_theme",
            Self::PluginAws => "plugin_aws",
            Self::PluginGit => "plugin_git",
            Self::PluginMercurial => "plugin_mercurial",
            Self::PluginTmux => "plugin_tmux",
            Self::Alias => "alias",
            Self::Bindkey => "bindkey",
            Self::Completion => "completion",
            Self::Conflicts => "conflicts",
        }
    }

    /// Label name as it appears on the pull request.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Core => "Area: core",
            Self::Init => "Area: init",
            Self::Install => "Area: installer",
            Self::Update => "Area: updater",
            Self::Plugin => "Area: plugin",
            Self::Theme => "Area: theme",
            Self::Uninstall => "Area: uninstaller",
            Self::NewPlugin => "New: plugin",
            Self::NewTheme => "New: theme",
            Self::PluginAws => "Plugin: aws",
            Self::PluginGit => "Plugin: git",
            Self::PluginMercurial => "Plugin: mercurial",
            Self::PluginTmux => "Plugin: tmux",
            Self::Alias => "Topic: alias",
            Self::Bindkey => "Topic: bindkey",
            Self::Completion => "Topic: completion",
            Self::Conflicts => "Status: conflicts",
        }
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for LabelKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [LabelKey; 17] = [
        LabelKey::Core,
        LabelKey::Init,
        LabelKey::Install,
        LabelKey::Update,
        LabelKey::Plugin,
        LabelKey::Theme,
        LabelKey::Uninstall,
        LabelKey::NewPlugin,
        LabelKey::NewTheme,
        LabelKey::PluginAws,
        LabelKey::PluginGit,
        LabelKey::PluginMercurial,
        LabelKey::PluginTmux,
        LabelKey::Alias,
        LabelKey::Bindkey,
        LabelKey::Completion,
        LabelKey::Conflicts,
    ];

    #[test]
    fn test_keys_and_display_names_are_unique() {
        let keys: HashSet<&str> = ALL.iter().map(|l| l.key()).collect();
        let names: HashSet<&str> = ALL.iter().map(|l| l.display_name()).collect();
        assert_eq!(keys.len(), ALL.len());
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_declaration_order_is_report_order() {
        let mut sorted = ALL;
        sorted.sort();
        assert_eq!(sorted, ALL);
    }

    #[test]
    fn test_display_uses_published_name() {
        assert_eq!(LabelKey::Install.to_string(), "Area: installer");
        assert_eq!(LabelKey::Conflicts.to_string(), "Status: conflicts");
    }

    #[test]
    fn test_serializes_as_short_key() {
        let json = serde_json::to_string(&LabelKey::PluginAws).unwrap();
        assert_eq!(json, "\"plugin_aws\"");
    }
}
