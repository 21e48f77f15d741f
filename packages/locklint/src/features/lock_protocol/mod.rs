/*
 * Lock Protocol
 *
 * The mutual-exclusion state machine:
 * - Six reachable states: unlocked, locked, rlocked plus the merge
 *   products ?locked, ?rlocked, ?rwlocked (Unknown is the transient
 *   merge seed)
 * - Four actions: lock, rlock, unlock, runlock
 * - transition() yields successor state + violation reason
 * - merge() joins states at control-flow convergence (commutative,
 *   idempotent, associative)
 * - satisfies() encodes write-subsumes-read for requirement checks
 *
 * Architecture:
 * - Domain only; pure functions over Copy enums, no I/O
 */

pub mod domain;

// Re-export main types
pub use domain::{merge, satisfies, transition, LockAction, LockState, LockStateMap};
