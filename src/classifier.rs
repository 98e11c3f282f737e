//! Terminal emulator detection

use std::collections::BTreeSet;

use crate::wm::ClientInfo;

/// WM_CLASS / executable names recognised out of the box
pub const DEFAULT_TERMINALS: &[&str] = &[
    "Alacritty",
    "kitty",
    "WezTerm",
    "wezterm",
    "st-256color",
    "st",
    "XTerm",
    "URxvt",
    "Terminator",
    "tilix",
    "qterminal",
    "konsole",
    "gnome-terminal",
    "foot",
];

/// Decides whether a client window is a terminal emulator
#[derive(Debug, Clone)]
pub struct TerminalClassifier {
    names: BTreeSet<String>,
}

impl Default for TerminalClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINALS.iter().copied())
    }
}

impl TerminalClassifier {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// True if any WM_CLASS entry, or the executable's base name, is on the
    /// allow-list. Matching is exact and case-sensitive.
    pub fn is_terminal(&self, client: &ClientInfo, exe_name: Option<&str>) -> bool {
        if client.wm_class.iter().any(|class| self.names.contains(class)) {
            return true;
        }

        exe_name
            .map(base_name)
            .is_some_and(|name| self.names.contains(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Strip any leading path, handling both separators
fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
