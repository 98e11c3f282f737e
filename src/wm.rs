//! Window-manager boundary: window identity, client metadata and the
//! outbound command capability the reactor depends on.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::errors::WmError;
use crate::process::ProcessId;

/// Opaque identifier of a client window, stable for the window's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub u64);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// What the window-manager binding knows about a newly mapped client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub window: WindowHandle,
    /// Owning process (`_NET_WM_PID`); absent for some clients
    #[serde(default)]
    pub pid: Option<ProcessId>,
    /// WM_CLASS instance and class names
    #[serde(default)]
    pub wm_class: Vec<String>,
}

impl ClientInfo {
    pub fn new(window: WindowHandle, pid: Option<ProcessId>, wm_class: &[&str]) -> Self {
        Self {
            window,
            pid,
            wm_class: wm_class.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Commands the reactor issues back to the window manager
pub trait WindowManager {
    /// Remove the window from the visible layout without destroying it
    fn hide(&mut self, window: WindowHandle) -> Result<(), WmError>;

    /// Put a previously hidden window back into the layout
    fn show(&mut self, window: WindowHandle) -> Result<(), WmError>;

    /// Give the window input focus. Bindings without a focus primitive may
    /// leave this as a no-op.
    fn focus(&mut self, _window: WindowHandle) -> Result<(), WmError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "command", content = "window", rename_all = "snake_case")]
pub enum WmCommand {
    Hide(WindowHandle),
    Show(WindowHandle),
    Focus(WindowHandle),
}

impl WmCommand {
    pub fn name(&self) -> &'static str {
        match self {
            WmCommand::Hide(_) => "hide",
            WmCommand::Show(_) => "show",
            WmCommand::Focus(_) => "focus",
        }
    }
}

/// In-memory window manager that tracks open and hidden windows and keeps a
/// log of every command that succeeded.
///
/// Commands against a window that is not mapped fail with
/// [`WmError::WindowGone`], which is how a real binding reports a window that
/// closed under our feet. A command registered with [`refuse`](Self::refuse)
/// fails with [`WmError::CommandFailed`] even though its window is open.
#[derive(Debug, Default)]
pub struct RecordingWindowManager {
    open: HashSet<WindowHandle>,
    hidden: HashSet<WindowHandle>,
    refused: HashSet<WmCommand>,
    commands: Vec<WmCommand>,
    failed: Vec<WmCommand>,
}

impl RecordingWindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a window as mapped
    pub fn map_window(&mut self, window: WindowHandle) {
        self.open.insert(window);
    }

    /// Mark a window as destroyed
    pub fn unmap_window(&mut self, window: WindowHandle) {
        self.open.remove(&window);
        self.hidden.remove(&window);
    }

    /// Reject every further occurrence of `command`
    pub fn refuse(&mut self, command: WmCommand) {
        self.refused.insert(command);
    }

    pub fn is_open(&self, window: WindowHandle) -> bool {
        self.open.contains(&window)
    }

    pub fn is_hidden(&self, window: WindowHandle) -> bool {
        self.hidden.contains(&window)
    }

    /// Successful commands, in issue order
    pub fn commands(&self) -> &[WmCommand] {
        &self.commands
    }

    /// Commands that were attempted but rejected
    pub fn failed(&self) -> &[WmCommand] {
        &self.failed
    }

    pub fn count(&self, command: WmCommand) -> usize {
        self.commands.iter().filter(|c| **c == command).count()
    }

    fn check_open(&mut self, command: WmCommand, window: WindowHandle) -> Result<(), WmError> {
        if !self.open.contains(&window) {
            self.failed.push(command);
            return Err(WmError::WindowGone { window });
        }

        if self.refused.contains(&command) {
            self.failed.push(command);
            return Err(WmError::CommandFailed {
                window,
                command: command.name(),
                message: "request refused".to_string(),
            });
        }

        self.commands.push(command);
        Ok(())
    }
}

impl WindowManager for RecordingWindowManager {
    fn hide(&mut self, window: WindowHandle) -> Result<(), WmError> {
        self.check_open(WmCommand::Hide(window), window)?;
        self.hidden.insert(window);
        Ok(())
    }

    fn show(&mut self, window: WindowHandle) -> Result<(), WmError> {
        self.check_open(WmCommand::Show(window), window)?;
        self.hidden.remove(&window);
        Ok(())
    }

    fn focus(&mut self, window: WindowHandle) -> Result<(), WmError> {
        self.check_open(WmCommand::Focus(window), window)
    }
}
