//! Read access to the OS process table

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use sysinfo::{Pid, System};

use super::ProcessId;

/// One row of the process table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub pid: ProcessId,
    #[serde(default)]
    pub parent: Option<ProcessId>,
    #[serde(default)]
    pub name: String,
    /// Seconds since the epoch
    #[serde(default)]
    pub start_time: u64,
}

/// Read-only view of running processes.
///
/// Every call re-reads live state; `None` means the process does not exist
/// (or exited between the caller's last look and this one).
pub trait ProcessTable {
    fn lookup(&self, pid: ProcessId) -> Option<ProcessEntry>;

    fn start_time(&self, pid: ProcessId) -> Option<u64> {
        self.lookup(pid).map(|entry| entry.start_time)
    }

    fn name_of(&self, pid: ProcessId) -> Option<String> {
        self.lookup(pid).map(|entry| entry.name)
    }
}

/// Live process table backed by `sysinfo`
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProcessTable;

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn lookup(&self, pid: ProcessId) -> Option<ProcessEntry> {
        // Fresh instance per lookup so rows of exited processes never linger
        let mut sys = System::new();
        let sys_pid = Pid::from_u32(pid);
        if !sys.refresh_process(sys_pid) {
            return None;
        }

        sys.process(sys_pid).map(|process| ProcessEntry {
            pid,
            parent: process.parent().map(|p| p.as_u32()),
            name: process.name().to_string(),
            start_time: process.start_time(),
        })
    }
}

/// Fixed in-memory process table for replays and tests
#[derive(Debug, Default, Clone)]
pub struct StaticProcessTable {
    entries: HashMap<ProcessId, ProcessEntry>,
}

impl StaticProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert with a start time of zero
    pub fn with(mut self, pid: ProcessId, parent: Option<ProcessId>, name: &str) -> Self {
        self.insert(ProcessEntry {
            pid,
            parent,
            name: name.to_string(),
            start_time: 0,
        });
        self
    }

    /// Insert or replace a row
    pub fn insert(&mut self, entry: ProcessEntry) {
        self.entries.insert(entry.pid, entry);
    }

    /// Simulate process exit
    pub fn remove(&mut self, pid: ProcessId) -> Option<ProcessEntry> {
        self.entries.remove(&pid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ProcessTable for StaticProcessTable {
    fn lookup(&self, pid: ProcessId) -> Option<ProcessEntry> {
        self.entries.get(&pid).cloned()
    }
}

impl<T: ProcessTable + ?Sized> ProcessTable for &T {
    fn lookup(&self, pid: ProcessId) -> Option<ProcessEntry> {
        (**self).lookup(pid)
    }
}
