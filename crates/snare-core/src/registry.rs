//! Breakpoint registry
//!
//! Owns every breakpoint of a session. Each operation takes the lock for the
//! in-memory change only, and the id counter advances under the same write
//! lock as the insert, so ids stay unique under concurrent use.

use parking_lot::RwLock;
use snare_common::{Breakpoint, BreakpointExtension, BreakpointId, NewBreakpoint};
use std::collections::BTreeMap;
use tracing::{debug, info};

struct RegistryState {
    breakpoints: BTreeMap<BreakpointId, Breakpoint>,
    /// Next id to hand out; never decreases, not even on clear
    next_id: u32,
}

pub struct BreakpointRegistry {
    state: RwLock<RegistryState>,
}

impl Default for BreakpointRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakpointRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState {
                breakpoints: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Store a breakpoint under the next id and return the stored copy
    pub fn add(&self, new: NewBreakpoint) -> Breakpoint {
        let mut state = self.state.write();
        let id = BreakpointId(state.next_id);
        state.next_id += 1;

        let bp = Breakpoint::from_new(id, new);
        state.breakpoints.insert(id, bp.clone());
        drop(state);

        info!(id = %id, location = %bp.location, enabled = bp.enabled, "Breakpoint registered");
        bp
    }

    /// Remove a breakpoint; false if no such id
    pub fn remove(&self, id: BreakpointId) -> bool {
        let removed = self.state.write().breakpoints.remove(&id).is_some();
        if removed {
            info!(id = %id, "Breakpoint removed");
        } else {
            debug!(id = %id, "Remove of unknown breakpoint ignored");
        }
        removed
    }

    /// Remove every breakpoint. Ids are not reset.
    pub fn clear(&self) {
        let count = {
            let mut state = self.state.write();
            let count = state.breakpoints.len();
            state.breakpoints.clear();
            count
        };
        info!(count, "Breakpoints cleared");
    }

    /// All breakpoints in ascending id order
    pub fn list(&self) -> Vec<Breakpoint> {
        self.state.read().breakpoints.values().cloned().collect()
    }

    pub fn find(&self, id: BreakpointId) -> Option<Breakpoint> {
        self.state.read().breakpoints.get(&id).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().breakpoints.is_empty()
    }

    /// Id the next `add` will use
    pub fn peek_next_id(&self) -> BreakpointId {
        BreakpointId(self.state.read().next_id)
    }

    /// Enable or disable; returns the updated breakpoint
    pub fn set_enabled(&self, id: BreakpointId, enabled: bool) -> Option<Breakpoint> {
        self.modify(id, |bp| bp.enabled = enabled)
    }

    /// Let the tracing engine update its bookkeeping for a breakpoint
    pub fn update_extension<F>(&self, id: BreakpointId, f: F) -> bool
    where
        F: FnOnce(&mut BreakpointExtension),
    {
        self.modify(id, |bp| f(&mut bp.extension)).is_some()
    }

    /// Apply `f` to one breakpoint under the write lock and return the
    /// updated copy; `None` if there is no such id
    pub fn modify<F>(&self, id: BreakpointId, f: F) -> Option<Breakpoint>
    where
        F: FnOnce(&mut Breakpoint),
    {
        let mut state = self.state.write();
        let bp = state.breakpoints.get_mut(&id)?;
        f(bp);
        Some(bp.clone())
    }
}
