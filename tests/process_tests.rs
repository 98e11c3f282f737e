//! Ancestry resolution and terminal classification

use termswallow::process::{self, ProcessEntry, ProcessTable, StaticProcessTable, SysinfoProcessTable};
use termswallow::{ClientInfo, TerminalClassifier, WindowHandle};

#[cfg(test)]
mod ancestry_tests {
    use super::*;

    fn chain_table() -> StaticProcessTable {
        // systemd(1) -> qtile(10) -> alacritty(20) -> zsh(30) -> sh(40) -> mpv(50)
        StaticProcessTable::new()
            .with(1, Some(0), "systemd")
            .with(10, Some(1), "qtile")
            .with(20, Some(10), "alacritty")
            .with(30, Some(20), "zsh")
            .with(40, Some(30), "sh")
            .with(50, Some(40), "mpv")
    }

    #[test]
    fn test_resolve_nearest_first_excluding_self_and_init() {
        let chain = process::resolve(&chain_table(), 50, 8);
        assert_eq!(chain, vec![40, 30, 20, 10]);
    }

    #[test]
    fn test_resolve_respects_max_depth() {
        let chain = process::resolve(&chain_table(), 50, 2);
        assert_eq!(chain, vec![40, 30]);
    }

    #[test]
    fn test_resolve_zero_depth_is_empty() {
        assert!(process::resolve(&chain_table(), 50, 0).is_empty());
    }

    #[test]
    fn test_resolve_unknown_pid_is_empty() {
        assert!(process::resolve(&chain_table(), 999, 8).is_empty());
    }

    #[test]
    fn test_resolve_returns_partial_chain_when_process_vanishes() {
        let mut table = chain_table();
        table.remove(30);

        // 40 still points at 30, but 30 is gone so the walk stops there
        let chain = process::resolve(&table, 50, 8);
        assert_eq!(chain, vec![40, 30]);
    }

    #[test]
    fn test_static_table_remove_simulates_exit() {
        let mut table = StaticProcessTable::new().with(5, Some(1), "a");
        assert_eq!(table.len(), 1);

        assert!(table.remove(5).is_some());
        assert!(table.is_empty());
        assert!(table.lookup(5).is_none());
        assert!(table.start_time(5).is_none());
    }

    #[test]
    fn test_resolve_stops_on_cycle() {
        let table = StaticProcessTable::new()
            .with(5, Some(6), "a")
            .with(6, Some(7), "b")
            .with(7, Some(5), "c");

        let chain = process::resolve(&table, 5, 8);
        assert_eq!(chain, vec![6, 7]);
    }

    #[test]
    fn test_resolve_stops_at_missing_parent() {
        let table = StaticProcessTable::new()
            .with(5, Some(6), "a")
            .with(6, None, "b");

        assert_eq!(process::resolve(&table, 5, 8), vec![6]);
    }

    #[test]
    fn test_resolve_is_restartable() {
        let mut table = chain_table();
        assert_eq!(process::resolve(&table, 50, 8), vec![40, 30, 20, 10]);

        // Re-parented after its parent exited
        table.insert(ProcessEntry {
            pid: 50,
            parent: Some(1),
            name: "mpv".to_string(),
            start_time: 0,
        });
        assert!(process::resolve(&table, 50, 8).is_empty());
    }

    #[test]
    fn test_live_table_resolves_current_process() {
        let table = SysinfoProcessTable::new();
        let pid = std::process::id();

        let entry = table.lookup(pid).expect("current process should be visible");
        assert_eq!(entry.pid, pid);

        let chain = process::resolve(&table, pid, 4);
        assert!(chain.len() <= 4);
        assert!(!chain.contains(&pid));
        assert!(!chain.contains(&1));
    }
}

#[cfg(test)]
mod classifier_tests {
    use super::*;

    fn client(classes: &[&str]) -> ClientInfo {
        ClientInfo::new(WindowHandle(1), Some(100), classes)
    }

    #[test]
    fn test_default_list_matches_wm_class() {
        let classifier = TerminalClassifier::default();
        assert!(classifier.is_terminal(&client(&["Alacritty", "Alacritty"]), None));
        assert!(classifier.is_terminal(&client(&["st-256color"]), None));
        assert!(classifier.is_terminal(&client(&["gnome-terminal-server", "gnome-terminal"]), None));
    }

    #[test]
    fn test_non_terminal_rejected() {
        let classifier = TerminalClassifier::default();
        assert!(!classifier.is_terminal(&client(&["mpv", "mpv"]), Some("mpv")));
        assert!(!classifier.is_terminal(&client(&[]), None));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let classifier = TerminalClassifier::default();
        assert!(!classifier.is_terminal(&client(&["ALACRITTY"]), None));
    }

    #[test]
    fn test_executable_name_with_path() {
        let classifier = TerminalClassifier::default();
        assert!(classifier.is_terminal(&client(&["unknown"]), Some("/usr/bin/foot")));
        assert!(classifier.is_terminal(&client(&[]), Some("kitty")));
    }

    #[test]
    fn test_custom_list_replaces_defaults() {
        let classifier = TerminalClassifier::new(["ghostty"]);
        assert!(classifier.is_terminal(&client(&["ghostty"]), None));
        assert!(!classifier.is_terminal(&client(&["Alacritty"]), None));
        assert_eq!(classifier.names().collect::<Vec<_>>(), vec!["ghostty"]);
    }
}
