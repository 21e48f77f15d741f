//! Lock state machine
//!
//! Pure transition and merge rules for mutual-exclusion state tracking.
//! A tracked object is at any program point in exactly one [`LockState`];
//! applying a [`LockAction`] yields the next state plus an optional
//! violation reason, and control-flow joins combine states with
//! [`merge`].
//!
//! The maybe-states arise only from merging: `?locked` means locked on
//! some paths and unlocked on others, `?rwlocked` means the paths
//! disagree about the lock mode itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lock state of one tracked object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    /// Transient bottom state; only appears as the seed while folding a
    /// merge, never at a program point
    Unknown,
    Unlocked,
    Locked,
    RLocked,
    /// Locked on some incoming paths
    MaybeLocked,
    /// Read-locked on some incoming paths
    MaybeRLocked,
    /// Write-locked on some paths, read-locked on others
    MaybeBoth,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LockState::Unknown => "unknown",
            LockState::Unlocked => "unlocked",
            LockState::Locked => "locked",
            LockState::RLocked => "rlocked",
            LockState::MaybeLocked => "?locked",
            LockState::MaybeRLocked => "?rlocked",
            LockState::MaybeBoth => "?rwlocked",
        };
        write!(f, "{}", text)
    }
}

/// Lock operation applied to a tracked object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockAction {
    Lock,
    RLock,
    Unlock,
    RUnlock,
}

impl LockAction {
    /// Recognize a lock method by name
    pub fn from_method(name: &str) -> Option<LockAction> {
        match name {
            "Lock" => Some(LockAction::Lock),
            "RLock" => Some(LockAction::RLock),
            "Unlock" => Some(LockAction::Unlock),
            "RUnlock" => Some(LockAction::RUnlock),
            _ => None,
        }
    }

    /// Whether this action acquires (rather than releases) the lock
    pub fn is_acquire(self) -> bool {
        matches!(self, LockAction::Lock | LockAction::RLock)
    }

    /// The state this action establishes when legal
    pub fn target_state(self) -> LockState {
        match self {
            LockAction::Lock => LockState::Locked,
            LockAction::RLock => LockState::RLocked,
            LockAction::Unlock | LockAction::RUnlock => LockState::Unlocked,
        }
    }
}

impl fmt::Display for LockAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LockAction::Lock => "lock",
            LockAction::RLock => "rlock",
            LockAction::Unlock => "unlock",
            LockAction::RUnlock => "runlock",
        };
        write!(f, "{}", text)
    }
}

/// Apply `action` to an object in `state`.
///
/// Returns the successor state and, when the action is illegal in that
/// state, the violation reason. Illegal actions still move the state
/// (re-locking pins the state to the acquired mode; a bad unlock drops
/// to unlocked) so one mistake does not cascade into follow-up reports.
///
/// # Example
/// ```
/// use locklint::features::lock_protocol::{transition, LockAction, LockState};
///
/// let (next, reason) = transition(LockState::Unlocked, LockAction::Lock);
/// assert_eq!(next, LockState::Locked);
/// assert_eq!(reason, None);
///
/// let (next, reason) = transition(LockState::Locked, LockAction::Lock);
/// assert_eq!(next, LockState::Locked);
/// assert_eq!(reason, Some("already locked"));
/// ```
pub fn transition(state: LockState, action: LockAction) -> (LockState, Option<&'static str>) {
    use LockAction::*;
    use LockState::*;

    match (state, action) {
        // Unknown never reaches a program point; behave as the default
        (Unknown, _) => transition(Unlocked, action),

        (Unlocked, Lock) => (Locked, None),
        (Unlocked, RLock) => (RLocked, None),
        (Unlocked, Unlock) => (Unlocked, Some("not locked")),
        (Unlocked, RUnlock) => (Unlocked, Some("not locked")),

        (Locked, Lock) => (Locked, Some("already locked")),
        (Locked, RLock) => (Locked, Some("already locked")),
        (Locked, Unlock) => (Unlocked, None),
        (Locked, RUnlock) => (Locked, Some("locked")),

        (RLocked, Lock) => (Locked, Some("already rlocked")),
        (RLocked, RLock) => (RLocked, Some("already rlocked")),
        (RLocked, Unlock) => (Unlocked, Some("rlocked")),
        (RLocked, RUnlock) => (Unlocked, None),

        (MaybeLocked, Lock) => (Locked, Some("already ?locked")),
        (MaybeLocked, RLock) => (MaybeBoth, Some("already ?locked")),
        (MaybeLocked, Unlock) => (Unlocked, None),
        (MaybeLocked, RUnlock) => (Unlocked, Some("?locked")),

        (MaybeRLocked, Lock) => (Locked, Some("already rlocked")),
        (MaybeRLocked, RLock) => (MaybeRLocked, Some("already rlocked")),
        (MaybeRLocked, Unlock) => (Unlocked, Some("?rlocked")),
        (MaybeRLocked, RUnlock) => (Unlocked, None),

        (MaybeBoth, Lock) => (Locked, Some("already ?locked")),
        (MaybeBoth, RLock) => (MaybeBoth, Some("already ?locked")),
        (MaybeBoth, Unlock) => (Unlocked, Some("?rwlocked")),
        (MaybeBoth, RUnlock) => (MaybeLocked, Some("?rwlocked")),
    }
}

/// Join two states at a control-flow merge point.
///
/// Commutative and idempotent; `Unknown` is the identity, `MaybeBoth`
/// absorbs everything else it disagrees with.
pub fn merge(a: LockState, b: LockState) -> LockState {
    use LockState::*;

    match (a, b) {
        (Unknown, other) | (other, Unknown) => other,
        (MaybeBoth, _) | (_, MaybeBoth) => MaybeBoth,

        (Unlocked, Unlocked) => Unlocked,
        (Locked, Locked) => Locked,
        (RLocked, RLocked) => RLocked,
        (MaybeLocked, MaybeLocked) => MaybeLocked,
        (MaybeRLocked, MaybeRLocked) => MaybeRLocked,

        (Unlocked, Locked) | (Locked, Unlocked) => MaybeLocked,
        (Unlocked, RLocked) | (RLocked, Unlocked) => MaybeRLocked,
        (Unlocked, MaybeLocked) | (MaybeLocked, Unlocked) => MaybeLocked,
        (Unlocked, MaybeRLocked) | (MaybeRLocked, Unlocked) => MaybeRLocked,

        (Locked, RLocked) | (RLocked, Locked) => MaybeBoth,
        (Locked, MaybeLocked) | (MaybeLocked, Locked) => MaybeLocked,
        (Locked, MaybeRLocked) | (MaybeRLocked, Locked) => MaybeBoth,

        (RLocked, MaybeLocked) | (MaybeLocked, RLocked) => MaybeBoth,
        (RLocked, MaybeRLocked) | (MaybeRLocked, RLocked) => MaybeRLocked,

        (MaybeLocked, MaybeRLocked) | (MaybeRLocked, MaybeLocked) => MaybeBoth,
    }
}

/// Whether `actual` satisfies a requirement of `required`.
///
/// Exact matches satisfy; a write lock also satisfies a read-lock
/// requirement, since exclusive access subsumes shared access.
pub fn satisfies(actual: LockState, required: LockState) -> bool {
    actual == required || (actual == LockState::Locked && required == LockState::RLocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_states() -> [LockState; 7] {
        [
            LockState::Unknown,
            LockState::Unlocked,
            LockState::Locked,
            LockState::RLocked,
            LockState::MaybeLocked,
            LockState::MaybeRLocked,
            LockState::MaybeBoth,
        ]
    }

    fn all_actions() -> [LockAction; 4] {
        [
            LockAction::Lock,
            LockAction::RLock,
            LockAction::Unlock,
            LockAction::RUnlock,
        ]
    }

    fn arb_state() -> impl Strategy<Value = LockState> {
        prop::sample::select(all_states().to_vec())
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(LockState::Unlocked.to_string(), "unlocked");
        assert_eq!(LockState::Locked.to_string(), "locked");
        assert_eq!(LockState::RLocked.to_string(), "rlocked");
        assert_eq!(LockState::MaybeLocked.to_string(), "?locked");
        assert_eq!(LockState::MaybeRLocked.to_string(), "?rlocked");
        assert_eq!(LockState::MaybeBoth.to_string(), "?rwlocked");
        assert_eq!(LockAction::Lock.to_string(), "lock");
        assert_eq!(LockAction::RLock.to_string(), "rlock");
        assert_eq!(LockAction::Unlock.to_string(), "unlock");
        assert_eq!(LockAction::RUnlock.to_string(), "runlock");
    }

    #[test]
    fn test_balanced_pair_is_clean() {
        let (s, r) = transition(LockState::Unlocked, LockAction::Lock);
        assert_eq!((s, r), (LockState::Locked, None));
        let (s, r) = transition(s, LockAction::Unlock);
        assert_eq!((s, r), (LockState::Unlocked, None));

        let (s, r) = transition(LockState::Unlocked, LockAction::RLock);
        assert_eq!((s, r), (LockState::RLocked, None));
        let (s, r) = transition(s, LockAction::RUnlock);
        assert_eq!((s, r), (LockState::Unlocked, None));
    }

    #[test]
    fn test_unlock_without_lock() {
        assert_eq!(
            transition(LockState::Unlocked, LockAction::Unlock),
            (LockState::Unlocked, Some("not locked"))
        );
        assert_eq!(
            transition(LockState::Unlocked, LockAction::RUnlock),
            (LockState::Unlocked, Some("not locked"))
        );
    }

    #[test]
    fn test_double_acquire() {
        assert_eq!(
            transition(LockState::Locked, LockAction::Lock),
            (LockState::Locked, Some("already locked"))
        );
        assert_eq!(
            transition(LockState::RLocked, LockAction::RLock),
            (LockState::RLocked, Some("already rlocked"))
        );
    }

    #[test]
    fn test_mode_mismatch_release() {
        // RUnlock on a write lock keeps the lock held
        assert_eq!(
            transition(LockState::Locked, LockAction::RUnlock),
            (LockState::Locked, Some("locked"))
        );
        // Unlock on a read lock still releases
        assert_eq!(
            transition(LockState::RLocked, LockAction::Unlock),
            (LockState::Unlocked, Some("rlocked"))
        );
    }

    #[test]
    fn test_maybe_states_report_possible_variants() {
        assert_eq!(
            transition(LockState::MaybeLocked, LockAction::Lock),
            (LockState::Locked, Some("already ?locked"))
        );
        assert_eq!(
            transition(LockState::MaybeLocked, LockAction::Unlock),
            (LockState::Unlocked, None)
        );
        assert_eq!(
            transition(LockState::MaybeRLocked, LockAction::RUnlock),
            (LockState::Unlocked, None)
        );
        assert_eq!(
            transition(LockState::MaybeBoth, LockAction::Unlock),
            (LockState::Unlocked, Some("?rwlocked"))
        );
        assert_eq!(
            transition(LockState::MaybeBoth, LockAction::RUnlock),
            (LockState::MaybeLocked, Some("?rwlocked"))
        );
    }

    #[test]
    fn test_merge_table() {
        use LockState::*;
        assert_eq!(merge(Unlocked, Locked), MaybeLocked);
        assert_eq!(merge(Unlocked, RLocked), MaybeRLocked);
        assert_eq!(merge(Locked, RLocked), MaybeBoth);
        assert_eq!(merge(Locked, MaybeLocked), MaybeLocked);
        assert_eq!(merge(RLocked, MaybeRLocked), MaybeRLocked);
        assert_eq!(merge(Locked, MaybeRLocked), MaybeBoth);
        assert_eq!(merge(RLocked, MaybeLocked), MaybeBoth);
        assert_eq!(merge(MaybeLocked, MaybeRLocked), MaybeBoth);
        assert_eq!(merge(Unknown, Locked), Locked);
    }

    #[test]
    fn test_satisfies_subsumption() {
        assert!(satisfies(LockState::Locked, LockState::Locked));
        assert!(satisfies(LockState::RLocked, LockState::RLocked));
        assert!(satisfies(LockState::Locked, LockState::RLocked));
        assert!(!satisfies(LockState::RLocked, LockState::Locked));
        assert!(!satisfies(LockState::Unlocked, LockState::Locked));
        assert!(!satisfies(LockState::MaybeLocked, LockState::Locked));
    }

    #[test]
    fn test_transition_total_over_real_states() {
        // every (state, action) pair yields a successor that is not
        // Unknown
        for state in all_states() {
            for action in all_actions() {
                let (next, _) = transition(state, action);
                assert_ne!(next, LockState::Unknown, "{state} x {action}");
            }
        }
    }

    proptest! {
        #[test]
        fn prop_merge_commutative(a in arb_state(), b in arb_state()) {
            prop_assert_eq!(merge(a, b), merge(b, a));
        }

        #[test]
        fn prop_merge_idempotent(a in arb_state()) {
            prop_assert_eq!(merge(a, a), a);
        }

        #[test]
        fn prop_merge_associative(a in arb_state(), b in arb_state(), c in arb_state()) {
            prop_assert_eq!(merge(merge(a, b), c), merge(a, merge(b, c)));
        }

        #[test]
        fn prop_unknown_is_identity(a in arb_state()) {
            prop_assert_eq!(merge(LockState::Unknown, a), a);
        }
    }
}
