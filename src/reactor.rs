//! Swallow reactor - the two window-manager hooks.
//!
//! The host calls [`SwallowReactor::handle_client_new`] and
//! [`SwallowReactor::handle_client_killed`] from its event loop, one event at
//! a time. Neither handler returns an error: every failure degrades to
//! "no swallow for this window" and is logged.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::classifier::TerminalClassifier;
use crate::config::SwallowConfig;
use crate::notify::NotificationEmitter;
use crate::process::{self, ProcessTable};
use crate::registry::{RemovedCandidate, SwallowRegistry, TerminalCandidate};
use crate::wm::{ClientInfo, WindowHandle, WindowManager};

/// What a `client_new` event turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewOutcome {
    Disabled,
    AlreadyTracked,
    NoPid,
    RegisteredTerminal,
    NoMatch,
    Swallowed { terminal: WindowHandle },
    HideFailed { terminal: WindowHandle },
}

/// What a `client_killed` event turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KilledOutcome {
    Untracked,
    Restored { terminal: WindowHandle },
    TerminalRemoved { orphaned: Option<WindowHandle> },
}

pub struct SwallowReactor<W, P> {
    enabled: bool,
    max_depth: usize,
    classifier: TerminalClassifier,
    registry: SwallowRegistry,
    wm: W,
    processes: P,
    emitter: NotificationEmitter,
}

impl<W: WindowManager, P: ProcessTable> SwallowReactor<W, P> {
    pub fn new(config: &SwallowConfig, wm: W, processes: P, emitter: NotificationEmitter) -> Self {
        Self {
            enabled: config.enabled,
            max_depth: config.max_ancestry_depth,
            classifier: config.classifier(),
            registry: SwallowRegistry::new(),
            wm,
            processes,
            emitter,
        }
    }

    pub fn registry(&self) -> &SwallowRegistry {
        &self.registry
    }

    pub fn window_manager(&self) -> &W {
        &self.wm
    }

    pub fn window_manager_mut(&mut self) -> &mut W {
        &mut self.wm
    }

    pub fn processes(&self) -> &P {
        &self.processes
    }

    pub fn processes_mut(&mut self) -> &mut P {
        &mut self.processes
    }

    pub fn handle_client_new(&mut self, client: &ClientInfo) -> NewOutcome {
        let window = client.window;

        if !self.enabled {
            debug!(%window, "swallow disabled; skipping client_new");
            return NewOutcome::Disabled;
        }

        if self.registry.is_tracked(window) {
            debug!(%window, "client_new for tracked window; ignoring");
            return NewOutcome::AlreadyTracked;
        }

        let Some(pid) = client.pid else {
            debug!(%window, "client has no pid; skipping");
            return NewOutcome::NoPid;
        };

        let entry = self.processes.lookup(pid);
        let exe_name = entry.as_ref().map(|e| e.name.as_str());

        if self.classifier.is_terminal(client, exe_name) {
            let start_time = entry.as_ref().map(|e| e.start_time);
            let displaced = self.registry.register_candidate(window, pid, start_time);
            self.release_displaced(displaced);
            debug!(%window, pid, wm_class = ?client.wm_class, "registered terminal");
            return NewOutcome::RegisteredTerminal;
        }

        let chain = process::resolve(&self.processes, pid, self.max_depth);
        let processes = &self.processes;
        let Some(terminal) = self
            .registry
            .try_match_with(&chain, |candidate| is_same_process(processes, candidate))
        else {
            debug!(%window, pid, ?chain, "no parent terminal");
            return NewOutcome::NoMatch;
        };

        if let Err(e) = self.wm.hide(terminal.window) {
            warn!(%window, terminal = %terminal.window, "failed to hide terminal: {e}");
            return NewOutcome::HideFailed {
                terminal: terminal.window,
            };
        }

        match self.registry.create_swallow(window, terminal.window) {
            Ok(()) => {
                info!(child = %window, terminal = %terminal.window, pid, "swallowed terminal");
                NewOutcome::Swallowed {
                    terminal: terminal.window,
                }
            }
            Err(e) => {
                // Unreachable through the checks above; undo the hide so the
                // terminal is not stranded.
                warn!(child = %window, "{e}");
                if let Err(e) = self.wm.show(terminal.window) {
                    debug!(terminal = %terminal.window, "{e}");
                }
                NewOutcome::HideFailed {
                    terminal: terminal.window,
                }
            }
        }
    }

    pub fn handle_client_killed(&mut self, window: WindowHandle) -> KilledOutcome {
        if let Some(swallow) = self.registry.remove_swallow(window) {
            let terminal = swallow.terminal_window;
            let held = Utc::now() - swallow.since;

            match self.wm.show(terminal) {
                Ok(()) => {
                    if let Err(e) = self.wm.focus(terminal) {
                        debug!(%terminal, "could not focus restored terminal: {e}");
                    }
                    info!(
                        child = %window,
                        %terminal,
                        held_secs = held.num_seconds(),
                        "restored terminal"
                    );
                    self.emitter.terminal_restored(terminal);
                }
                Err(e) => warn!(child = %window, %terminal, "failed to restore terminal: {e}"),
            }

            return KilledOutcome::Restored { terminal };
        }

        if let Some(pid) = self.registry.candidate_by_window(window).map(|c| c.pid) {
            let orphaned = self
                .registry
                .remove_candidate(pid)
                .and_then(|removed| removed.orphaned)
                .map(|s| s.child_window);
            if let Some(child) = orphaned {
                info!(terminal = %window, %child, "terminal closed while swallowed; child left visible");
            } else {
                debug!(terminal = %window, pid, "terminal closed");
            }
            return KilledOutcome::TerminalRemoved { orphaned };
        }

        debug!(%window, "client_killed for untracked window");
        KilledOutcome::Untracked
    }

    /// A candidate displaced by re-registration may still be hidden behind
    /// a child; show it again so it is not lost.
    fn release_displaced(&mut self, displaced: Vec<RemovedCandidate>) {
        for removed in displaced {
            let Some(swallow) = removed.orphaned else {
                continue;
            };
            warn!(
                terminal = %removed.candidate.window,
                pid = removed.candidate.pid,
                child = %swallow.child_window,
                "pid re-registered while terminal was swallowed; restoring it"
            );
            if let Err(e) = self.wm.show(removed.candidate.window) {
                debug!(terminal = %removed.candidate.window, "{e}");
            }
        }
    }
}

/// Reject a candidate whose pid now belongs to a different process
fn is_same_process<P: ProcessTable>(processes: &P, candidate: &TerminalCandidate) -> bool {
    match (candidate.start_time, processes.start_time(candidate.pid)) {
        (Some(registered), Some(live)) if registered != live => {
            debug!(
                pid = candidate.pid,
                registered,
                live,
                "candidate pid reused by another process; skipping"
            );
            false
        }
        _ => true,
    }
}
