//! Parent-chain resolution

use std::collections::HashSet;
use tracing::{debug, warn};

use super::{ProcessId, ProcessTable};

/// Default bound on parent hops
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Walk the parent chain of `pid`, nearest ancestor first.
///
/// The starting pid is not part of the result, and neither is init (pid 1)
/// or the kernel (pid 0). The walk stops after `max_depth` ancestors, at the
/// root, on a repeated pid, or when a process in the chain has vanished; in
/// every case the ancestors collected so far are returned.
pub fn resolve<P: ProcessTable + ?Sized>(
    table: &P,
    pid: ProcessId,
    max_depth: usize,
) -> Vec<ProcessId> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    seen.insert(pid);

    let mut current = pid;
    while chain.len() < max_depth {
        let Some(entry) = table.lookup(current) else {
            debug!(pid = current, "ancestry: process vanished mid-walk");
            break;
        };

        let parent = match entry.parent {
            Some(parent) if parent > 1 => parent,
            _ => break,
        };

        if !seen.insert(parent) {
            warn!(pid = current, parent, "ancestry: cycle in parent chain");
            break;
        }

        chain.push(parent);
        current = parent;
    }

    debug!(pid, ?chain, "ancestry resolved");
    chain
}
