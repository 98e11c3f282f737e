//! Process-table introspection and ancestry walking

pub mod ancestry;
pub mod table;

pub use ancestry::{resolve, DEFAULT_MAX_DEPTH};
pub use table::{ProcessEntry, ProcessTable, StaticProcessTable, SysinfoProcessTable};

/// OS-assigned process id. May be reused after the process exits.
pub type ProcessId = u32;
