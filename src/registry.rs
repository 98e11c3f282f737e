//! Swallow registry - terminals awaiting a child and active swallows

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::errors::RegistryError;
use crate::process::ProcessId;
use crate::wm::WindowHandle;

/// A terminal window eligible to swallow a future child
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalCandidate {
    pub window: WindowHandle,
    pub pid: ProcessId,
    /// True exactly while a child is swallowed against this terminal
    pub hidden: bool,
    /// Process start time at registration, used to spot pid reuse
    pub start_time: Option<u64>,
    pub registered_at: DateTime<Utc>,
}

/// A child window currently hiding its terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSwallow {
    pub child_window: WindowHandle,
    pub terminal_window: WindowHandle,
    pub since: DateTime<Utc>,
}

/// Result of dropping a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedCandidate {
    pub candidate: TerminalCandidate,
    /// Swallow that referenced the candidate; its child is left as is
    pub orphaned: Option<ActiveSwallow>,
}

/// Sorted copy of the registry contents
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub candidates: Vec<TerminalCandidate>,
    pub swallows: Vec<ActiveSwallow>,
}

/// In-memory swallow state for one window-manager session.
///
/// Both maps are updated together by every method so that each active
/// swallow points at a hidden candidate and no terminal backs two swallows.
#[derive(Debug, Default)]
pub struct SwallowRegistry {
    candidates_by_pid: HashMap<ProcessId, TerminalCandidate>,
    swallows_by_child: HashMap<WindowHandle, ActiveSwallow>,
}

impl SwallowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a terminal window under its pid.
    ///
    /// An existing entry for the same pid (or the same window) is treated as
    /// stale and replaced; displaced candidates are returned together with
    /// any swallow they were backing.
    pub fn register_candidate(
        &mut self,
        window: WindowHandle,
        pid: ProcessId,
        start_time: Option<u64>,
    ) -> Vec<RemovedCandidate> {
        let mut displaced: Vec<_> = self.remove_candidate(pid).into_iter().collect();

        if let Some(other_pid) = self.candidate_by_window(window).map(|c| c.pid) {
            displaced.extend(self.remove_candidate(other_pid));
        }

        self.candidates_by_pid.insert(
            pid,
            TerminalCandidate {
                window,
                pid,
                hidden: false,
                start_time,
                registered_at: Utc::now(),
            },
        );
        debug!(%window, pid, "registry: candidate registered");

        displaced
    }

    /// Drop a candidate. If it was hidden, the swallow it backed goes too.
    pub fn remove_candidate(&mut self, pid: ProcessId) -> Option<RemovedCandidate> {
        let candidate = self.candidates_by_pid.remove(&pid)?;

        let orphaned = if candidate.hidden {
            let child = self
                .swallows_by_child
                .values()
                .find(|s| s.terminal_window == candidate.window)
                .map(|s| s.child_window);
            child.and_then(|c| self.swallows_by_child.remove(&c))
        } else {
            None
        };

        debug!(
            window = %candidate.window,
            pid,
            orphaned = ?orphaned.as_ref().map(|s| s.child_window),
            "registry: candidate removed"
        );

        Some(RemovedCandidate {
            candidate,
            orphaned,
        })
    }

    pub fn candidate(&self, pid: ProcessId) -> Option<&TerminalCandidate> {
        self.candidates_by_pid.get(&pid)
    }

    pub fn candidate_by_window(&self, window: WindowHandle) -> Option<&TerminalCandidate> {
        self.candidates_by_pid.values().find(|c| c.window == window)
    }

    /// First unhidden candidate along the chain, nearest ancestor first
    pub fn try_match(&self, chain: &[ProcessId]) -> Option<TerminalCandidate> {
        self.try_match_with(chain, |_| true)
    }

    /// Like [`try_match`](Self::try_match), but candidates rejected by
    /// `accept` are skipped and the scan moves on to the next ancestor.
    pub fn try_match_with<F>(&self, chain: &[ProcessId], mut accept: F) -> Option<TerminalCandidate>
    where
        F: FnMut(&TerminalCandidate) -> bool,
    {
        chain
            .iter()
            .filter_map(|pid| self.candidates_by_pid.get(pid))
            .find(|c| !c.hidden && accept(c))
            .cloned()
    }

    /// Record that `child` now hides `terminal`
    pub fn create_swallow(
        &mut self,
        child: WindowHandle,
        terminal: WindowHandle,
    ) -> Result<(), RegistryError> {
        if self.swallows_by_child.contains_key(&child) {
            return Err(RegistryError::ChildAlreadySwallowed { window: child });
        }

        let candidate = self
            .candidates_by_pid
            .values_mut()
            .find(|c| c.window == terminal)
            .ok_or(RegistryError::UnknownTerminal { window: terminal })?;

        if candidate.hidden {
            return Err(RegistryError::TerminalAlreadyHidden { window: terminal });
        }

        candidate.hidden = true;
        self.swallows_by_child.insert(
            child,
            ActiveSwallow {
                child_window: child,
                terminal_window: terminal,
                since: Utc::now(),
            },
        );
        debug!(%child, %terminal, "registry: swallow created");

        Ok(())
    }

    /// Forget the swallow for `child` and mark its terminal visible again
    pub fn remove_swallow(&mut self, child: WindowHandle) -> Option<ActiveSwallow> {
        let swallow = self.swallows_by_child.remove(&child)?;

        if let Some(candidate) = self
            .candidates_by_pid
            .values_mut()
            .find(|c| c.window == swallow.terminal_window)
        {
            candidate.hidden = false;
        }
        debug!(%child, terminal = %swallow.terminal_window, "registry: swallow removed");

        Some(swallow)
    }

    pub fn swallow(&self, child: WindowHandle) -> Option<&ActiveSwallow> {
        self.swallows_by_child.get(&child)
    }

    pub fn swallow_for_terminal(&self, terminal: WindowHandle) -> Option<&ActiveSwallow> {
        self.swallows_by_child
            .values()
            .find(|s| s.terminal_window == terminal)
    }

    /// True if the window is a registered terminal or a swallowed child
    pub fn is_tracked(&self, window: WindowHandle) -> bool {
        self.swallows_by_child.contains_key(&window) || self.candidate_by_window(window).is_some()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &TerminalCandidate> {
        self.candidates_by_pid.values()
    }

    pub fn swallows(&self) -> impl Iterator<Item = &ActiveSwallow> {
        self.swallows_by_child.values()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates_by_pid.len()
    }

    pub fn swallow_count(&self) -> usize {
        self.swallows_by_child.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates_by_pid.is_empty() && self.swallows_by_child.is_empty()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut candidates: Vec<_> = self.candidates_by_pid.values().cloned().collect();
        candidates.sort_by_key(|c| c.pid);
        let mut swallows: Vec<_> = self.swallows_by_child.values().cloned().collect();
        swallows.sort_by_key(|s| s.child_window);

        RegistrySnapshot {
            candidates,
            swallows,
        }
    }

    /// Check the cross-map invariants: every swallow's terminal is a hidden
    /// candidate, no terminal backs two swallows, every hidden candidate backs
    /// one, and map keys agree with the stored values.
    pub fn check_consistency(&self) -> Result<(), RegistryError> {
        let inconsistent = |message: String| -> Result<(), RegistryError> {
            Err(RegistryError::Inconsistent { message })
        };

        for (pid, candidate) in &self.candidates_by_pid {
            if candidate.pid != *pid {
                return inconsistent(format!("candidate {} stored under pid {pid}", candidate.pid));
            }
            let backing = self
                .swallows_by_child
                .values()
                .filter(|s| s.terminal_window == candidate.window)
                .count();
            match (candidate.hidden, backing) {
                (true, 1) | (false, 0) => {}
                (hidden, n) => {
                    return inconsistent(format!(
                        "terminal {} hidden={hidden} backs {n} swallows",
                        candidate.window
                    ))
                }
            }
        }

        for (child, swallow) in &self.swallows_by_child {
            if swallow.child_window != *child {
                return inconsistent(format!("swallow for {} stored under {child}", swallow.child_window));
            }
            match self.candidate_by_window(swallow.terminal_window) {
                Some(c) if c.hidden => {}
                _ => {
                    return inconsistent(format!(
                        "swallow {child} references terminal {} with no hidden candidate",
                        swallow.terminal_window
                    ))
                }
            }
        }

        Ok(())
    }
}
