//! Lock annotations
//!
//! An annotation declares a lock requirement in a doc comment:
//!
//! ```go
//! // locklint:t.mu.Lock
//! func (t *T) mutate() { ... }
//! ```
//!
//! On a function it means "callers hold `t.mu` in write mode before
//! calling". On a struct field or package variable it is a guard:
//! "accesses require the named lock". A `!` prefix negates the
//! requirement ("callers must not hold").

use crate::features::lock_protocol::{LockAction, LockState};
use crate::features::syntax::ObjectPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which lock mode an annotation demands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationKind {
    Lock,
    RLock,
}

impl AnnotationKind {
    /// Parse the trailing action segment of an annotation record
    pub fn from_suffix(suffix: &str) -> Option<AnnotationKind> {
        match suffix {
            "Lock" => Some(AnnotationKind::Lock),
            "RLock" => Some(AnnotationKind::RLock),
            _ => None,
        }
    }

    /// The state callers must have established
    pub fn required_state(self) -> LockState {
        match self {
            AnnotationKind::Lock => LockState::Locked,
            AnnotationKind::RLock => LockState::RLocked,
        }
    }

    /// The acquire action this annotation forbids inside the annotated
    /// function (the caller already holds the lock)
    pub fn acquire_action(self) -> LockAction {
        match self {
            AnnotationKind::Lock => LockAction::Lock,
            AnnotationKind::RLock => LockAction::RLock,
        }
    }

    /// Whether `self` as a held mode satisfies a requirement of `other`
    pub fn covers(self, other: AnnotationKind) -> bool {
        self == other || (self == AnnotationKind::Lock && other == AnnotationKind::RLock)
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationKind::Lock => write!(f, "Lock"),
            AnnotationKind::RLock => write!(f, "RLock"),
        }
    }
}

/// One parsed annotation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub path: ObjectPath,
    pub kind: AnnotationKind,
    pub negated: bool,
}

impl Annotation {
    pub fn new(path: ObjectPath, kind: AnnotationKind, negated: bool) -> Self {
        Self {
            path,
            kind,
            negated,
        }
    }

    /// The state this annotation requires at a call site
    pub fn required_state(&self) -> LockState {
        if self.negated {
            LockState::Unlocked
        } else {
            self.kind.required_state()
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}.{}", self.path, self.kind)
    }
}
