//! Desktop notification on terminal restore.
//!
//! Delivery is best-effort: a failed notification is logged and otherwise
//! ignored, so it can never affect swallow state.

use tracing::{debug, warn};

use crate::config::NotifyConfig;
use crate::errors::NotifyError;
use crate::wm::WindowHandle;

/// Something that can show a banner
pub trait Notifier {
    fn notify(&self, title: &str, body: &str, timeout_ms: u32) -> Result<(), NotifyError>;
}

/// Freedesktop notification via `notify-rust`
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str, timeout_ms: u32) -> Result<(), NotifyError> {
        use notify_rust::Notification;

        Notification::new()
            .summary(title)
            .body(body)
            .timeout(notify_rust::Timeout::Milliseconds(timeout_ms))
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Delivery {
                message: e.to_string(),
            })
    }
}

pub struct NotificationEmitter {
    config: NotifyConfig,
    /// `None` when notifications are switched off outright
    notifier: Option<Box<dyn Notifier>>,
}

impl NotificationEmitter {
    pub fn new(config: NotifyConfig, notifier: Box<dyn Notifier>) -> Self {
        Self {
            config,
            notifier: Some(notifier),
        }
    }

    /// Emitter backed by the desktop notification daemon
    pub fn desktop(config: NotifyConfig) -> Self {
        Self::new(config, Box::new(DesktopNotifier))
    }

    /// Emitter that never shows anything
    pub fn disabled() -> Self {
        Self {
            config: NotifyConfig {
                enabled: false,
                ..NotifyConfig::default()
            },
            notifier: None,
        }
    }

    pub fn terminal_restored(&self, terminal: WindowHandle) {
        self.emit("Terminal restored", terminal);
    }

    fn emit(&self, body: &str, window: WindowHandle) {
        let Some(notifier) = self.notifier.as_ref().filter(|_| self.config.enabled) else {
            return;
        };

        let title = if self.config.title.is_empty() {
            "Swallow"
        } else {
            self.config.title.as_str()
        };

        match notifier.notify(title, body, self.config.timeout_ms) {
            Ok(()) => debug!(%window, "notification sent"),
            Err(e) => warn!(%window, "{e}"),
        }
    }
}
