//! Per-path lock state map
//!
//! Maps tracked objects to their current [`LockState`] along one
//! execution path. Objects not present are unlocked; the map only
//! materializes entries once an action or merge touches them.

use super::state::{merge, transition, LockAction, LockState};
use crate::shared::models::ObjectId;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockStateMap {
    states: FxHashMap<ObjectId, LockState>,
}

impl LockStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `id`; absent entries are unlocked
    pub fn state(&self, id: ObjectId) -> LockState {
        self.states
            .get(&id)
            .copied()
            .unwrap_or(LockState::Unlocked)
    }

    pub fn set(&mut self, id: ObjectId, state: LockState) {
        self.states.insert(id, state);
    }

    /// Apply `action` to `id`, returning the violation reason if the
    /// action was illegal in the current state
    pub fn apply(&mut self, id: ObjectId, action: LockAction) -> Option<&'static str> {
        let (next, reason) = transition(self.state(id), action);
        self.states.insert(id, next);
        reason
    }

    /// Join the states of every map in `maps` (one per converging path).
    ///
    /// The result covers the union of tracked ids; an id missing from
    /// one of the maps contributes its default (unlocked) state to the
    /// join.
    pub fn merge_all(maps: &[LockStateMap]) -> LockStateMap {
        let mut ids: FxHashSet<ObjectId> = FxHashSet::default();
        for map in maps {
            ids.extend(map.states.keys().copied());
        }

        let mut merged = LockStateMap::new();
        for id in ids {
            let mut acc = LockState::Unknown;
            for map in maps {
                acc = merge(acc, map.state(id));
            }
            merged.states.insert(id, acc);
        }
        merged
    }

}
