//! Error types for the swallow subsystem

use std::path::PathBuf;

use crate::wm::WindowHandle;

/// Failure of an outbound window-manager command
#[derive(Debug, thiserror::Error)]
pub enum WmError {
    #[error("Window {window} no longer exists")]
    WindowGone { window: WindowHandle },

    #[error("Window manager rejected '{command}' for window {window}: {message}")]
    CommandFailed {
        window: WindowHandle,
        command: &'static str,
        message: String,
    },
}

/// Consistency guard on registry mutations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Terminal window {window} is not a registered candidate")]
    UnknownTerminal { window: WindowHandle },

    #[error("Terminal window {window} is already swallowing a child")]
    TerminalAlreadyHidden { window: WindowHandle },

    #[error("Child window {window} is already swallowed")]
    ChildAlreadySwallowed { window: WindowHandle },

    #[error("Registry is inconsistent: {message}")]
    Inconsistent { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to deliver desktop notification: {message}")]
    Delivery { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("Failed to read replay script '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid replay event on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
