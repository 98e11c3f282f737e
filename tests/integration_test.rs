//! End-to-end replay of recorded sessions through the reactor

use anyhow::Result;
use std::fs;
use tempfile::TempDir;

use termswallow::config::SwallowConfig;
use termswallow::errors::ReplayError;
use termswallow::process::StaticProcessTable;
use termswallow::replay::{self, ReplayEvent};
use termswallow::wm::{RecordingWindowManager, WmCommand};
use termswallow::{NotificationEmitter, SwallowReactor, WindowHandle};

const SESSION: &str = r#"
# alacritty -> zsh -> mpv
{"event":"process","pid":100,"parent":1,"name":"alacritty"}
{"event":"process","pid":101,"parent":100,"name":"zsh"}
{"event":"process","pid":102,"parent":101,"name":"mpv"}
{"event":"client_new","window":1,"pid":100,"wm_class":["Alacritty","Alacritty"]}
{"event":"client_new","window":2,"pid":102,"wm_class":["mpv","mpv"]}
{"event":"client_killed","window":2}
{"event":"exit","pid":102}
"#;

fn new_reactor() -> SwallowReactor<RecordingWindowManager, StaticProcessTable> {
    SwallowReactor::new(
        &SwallowConfig::default(),
        RecordingWindowManager::new(),
        StaticProcessTable::new(),
        NotificationEmitter::disabled(),
    )
}

#[test]
fn test_replay_session_round_trip() -> Result<()> {
    let events = replay::parse_script(SESSION)?;
    assert_eq!(events.len(), 7);

    let mut reactor = new_reactor();
    let report = replay::run(&mut reactor, &events);

    let t = WindowHandle(1);
    assert_eq!(
        report.commands,
        vec![WmCommand::Hide(t), WmCommand::Show(t), WmCommand::Focus(t)]
    );
    assert!(report.failed.is_empty());
    assert_eq!(report.registry.candidates.len(), 1);
    assert!(!report.registry.candidates[0].hidden);
    assert!(report.registry.swallows.is_empty());
    assert_eq!(reactor.processes().len(), 2);
    assert!(!reactor.processes().is_empty());
    Ok(())
}

#[test]
fn test_replay_orphaned_child() -> Result<()> {
    let script = r#"
{"event":"process","pid":100,"parent":1,"name":"kitty"}
{"event":"process","pid":102,"parent":100,"name":"zathura"}
{"event":"client_new","window":1,"pid":100,"wm_class":["kitty"]}
{"event":"client_new","window":2,"pid":102,"wm_class":["Zathura"]}
{"event":"client_killed","window":1}
{"event":"client_killed","window":2}
"#;
    let events = replay::parse_script(script)?;
    let mut reactor = new_reactor();
    let report = replay::run(&mut reactor, &events);

    assert_eq!(report.commands, vec![WmCommand::Hide(WindowHandle(1))]);
    assert!(report.registry.candidates.is_empty());
    assert!(report.registry.swallows.is_empty());
    Ok(())
}

#[test]
fn test_replay_from_file_and_report_json() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("session.jsonl");
    fs::write(&path, SESSION)?;

    let events = replay::load_script(&path)?;
    let mut reactor = new_reactor();
    let report = replay::run(&mut reactor, &events);

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["events"], 7);
    assert_eq!(json["commands"][0]["command"], "hide");
    assert_eq!(json["commands"][0]["window"], 1);
    assert_eq!(json["registry"]["candidates"][0]["pid"], 100);
    Ok(())
}

#[test]
fn test_replay_event_shapes() -> Result<()> {
    let event: ReplayEvent = serde_json::from_str(r#"{"event":"client_new","window":9}"#)?;
    match event {
        ReplayEvent::ClientNew(client) => {
            assert_eq!(client.window, WindowHandle(9));
            assert_eq!(client.pid, None);
            assert!(client.wm_class.is_empty());
        }
        other => panic!("unexpected event {other:?}"),
    }
    Ok(())
}

#[test]
fn test_replay_reports_bad_line_number() {
    let script = "{\"event\":\"exit\",\"pid\":1}\n\n{\"event\":\"teleport\"}\n";
    match replay::parse_script(script) {
        Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_replay_missing_file() {
    let result = replay::load_script(std::path::Path::new("/nonexistent/session.jsonl"));
    assert!(matches!(result, Err(ReplayError::Read { .. })));
}
