//! Replay of recorded window-manager sessions.
//!
//! A script is JSON lines, one event per line. Blank lines and lines starting
//! with `#` are skipped.
//!
//! ```text
//! {"event":"process","pid":100,"parent":1,"name":"alacritty"}
//! {"event":"process","pid":200,"parent":100,"name":"mpv"}
//! {"event":"client_new","window":1,"pid":100,"wm_class":["Alacritty"]}
//! {"event":"client_new","window":2,"pid":200,"wm_class":["mpv"]}
//! {"event":"client_killed","window":2}
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ReplayError;
use crate::process::{ProcessEntry, ProcessId, StaticProcessTable};
use crate::reactor::SwallowReactor;
use crate::registry::RegistrySnapshot;
use crate::wm::{ClientInfo, RecordingWindowManager, WindowHandle, WmCommand};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Add or replace a process table row
    Process(ProcessEntry),
    /// Drop a process table row
    Exit { pid: ProcessId },
    ClientNew(ClientInfo),
    ClientKilled { window: WindowHandle },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub events: usize,
    pub commands: Vec<WmCommand>,
    pub failed: Vec<WmCommand>,
    pub registry: RegistrySnapshot,
}

pub fn parse_script(text: &str) -> Result<Vec<ReplayEvent>, ReplayError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|source| ReplayError::Parse {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

pub fn load_script(path: &Path) -> Result<Vec<ReplayEvent>, ReplayError> {
    let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_script(&text)
}

/// Feed events through the reactor, keeping the fake window manager and
/// process table in step with them.
pub fn run(
    reactor: &mut SwallowReactor<RecordingWindowManager, StaticProcessTable>,
    events: &[ReplayEvent],
) -> ReplayReport {
    for event in events {
        match event {
            ReplayEvent::Process(entry) => reactor.processes_mut().insert(entry.clone()),
            ReplayEvent::Exit { pid } => {
                reactor.processes_mut().remove(*pid);
            }
            ReplayEvent::ClientNew(client) => {
                reactor.window_manager_mut().map_window(client.window);
                reactor.handle_client_new(client);
            }
            ReplayEvent::ClientKilled { window } => {
                reactor.handle_client_killed(*window);
                reactor.window_manager_mut().unmap_window(*window);
            }
        }
    }

    let wm = reactor.window_manager();
    ReplayReport {
        events: events.len(),
        commands: wm.commands().to_vec(),
        failed: wm.failed().to_vec(),
        registry: reactor.registry().snapshot(),
    }
}
