//! Exclusion set: process names that are never terminated

use std::collections::BTreeSet;

/// Name of this binary, excluded so the reaper never terminates itself
/// through a minimized console window.
pub const SELF_PROCESS_NAMES: [&str; 2] = ["idle-reaper.exe", "idle-reaper"];

/// Baseline process names that are always excluded.
///
/// These cover the window manager / compositor, the desktop shell, and a
/// handful of background helpers that keep a minimized window around for
/// their whole lifetime.
pub fn default_baseline() -> Vec<String> {
    let mut names: Vec<String> = vec![
        // Windows shell & compositor
        "dwm.exe".into(),
        "explorer.exe".into(),
        // Long-lived helpers
        "Discord.exe".into(),
        "steam.exe".into(),
        "steamwebhelper.exe".into(),
        "Spotify.exe".into(),
        "pythonw.exe".into(),
        "py.exe".into(),
        // X11 shells and window managers
        "Xorg".into(),
        "gnome-shell".into(),
        "plasmashell".into(),
        "kwin_x11".into(),
        "xfwm4".into(),
        "xfdesktop".into(),
    ];
    names.extend(SELF_PROCESS_NAMES.iter().map(|n| n.to_string()));
    names
}

/// Set of excluded process names.
///
/// Matching is exact on the whole process name and ignores case, since
/// image names are case-insensitive on Windows. Names are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from any list of names. Blank entries are ignored.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend(names);
        set
    }

    /// Set holding only the built-in baseline.
    pub fn baseline() -> Self {
        Self::from_names(default_baseline())
    }

    /// Add a name. Returns `false` if it was blank or already present.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name.to_lowercase())
    }

    pub fn contains(&self, process_name: &str) -> bool {
        self.names.contains(&process_name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Stored (lowercased) names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_contents() {
        let set = ExclusionSet::baseline();
        assert!(set.contains("dwm.exe"));
        assert!(set.contains("explorer.exe"));
        assert!(set.contains("idle-reaper.exe"));
        assert!(!set.contains("notepad.exe"));
    }

    #[test]
    fn test_case_insensitive_exact_match() {
        let set = ExclusionSet::from_names(["Explorer.exe"]);
        assert!(set.contains("explorer.exe"));
        assert!(set.contains("EXPLORER.EXE"));
        // Whole-name match only, no substring hits
        assert!(!set.contains("explorer"));
        assert!(!set.contains("myexplorer.exe"));
    }

    #[test]
    fn test_blank_names_ignored() {
        let mut set = ExclusionSet::new();
        assert!(!set.insert(""));
        assert!(!set.insert("   "));
        assert!(set.insert(" code.exe "));
        assert!(!set.insert("CODE.EXE"));
        assert_eq!(set.len(), 1);
        assert!(set.contains("code.exe"));
    }

    #[test]
    fn test_extend_unions() {
        let mut set = ExclusionSet::from_names(["dwm.exe"]);
        set.extend(vec!["slack.exe".to_string(), "dwm.exe".to_string()]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["dwm.exe", "slack.exe"]);
    }
}
