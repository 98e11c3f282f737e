//! termswallow - hide a terminal while the graphical program it spawned is
//! open, and bring it back when that program exits.

pub mod classifier;
pub mod config;
pub mod errors;
pub mod notify;
pub mod process;
pub mod reactor;
pub mod registry;
pub mod replay;
pub mod wm;

// Re-export commonly used types
pub use classifier::TerminalClassifier;
pub use config::Config;
pub use notify::{NotificationEmitter, Notifier};
pub use reactor::{KilledOutcome, NewOutcome, SwallowReactor};
pub use registry::{ActiveSwallow, SwallowRegistry, TerminalCandidate};
pub use wm::{ClientInfo, WindowHandle, WindowManager};
