//! Violations
//!
//! A violation is a finding, not a failure: analysis keeps going and
//! collects them as [`Report`]s. The `Display` impls here are the
//! user-facing message formats.
//!
//! # Example
//!
//! ```
//! use locklint::features::checking::CheckError;
//! use locklint::features::lock_protocol::LockAction;
//!
//! let err = CheckError::InvalidAction {
//!     subject: "func3".to_string(),
//!     object: "t.m".to_string(),
//!     action: LockAction::Lock,
//!     reason: Some("annotation".to_string()),
//! };
//! assert_eq!(err.to_string(), r#"func3 cannot "lock" t.m [annotation]"#);
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::features::lock_protocol::{LockAction, LockState};
use crate::shared::models::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// A lock method call that the current state or an annotation
    /// forbids
    InvalidAction {
        /// Function being checked; empty when the finding is not tied
        /// to a declared contract
        subject: String,
        object: String,
        action: LockAction,
        reason: Option<String>,
    },
    /// A lock found in the wrong state, either at a guarded access or
    /// at a call into a function that declares requirements
    InvalidState {
        object: String,
        expected: LockState,
        actual: LockState,
        reason: Option<String>,
    },
    /// A lock action on a name that never resolved to an object
    UnknownObject { name: String },
    /// A call to a method the package does not declare
    UnknownMethod { name: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckError::InvalidAction {
                subject,
                object,
                action,
                reason,
            } => {
                if !subject.is_empty() {
                    write!(f, "{subject} ")?;
                }
                write!(f, "cannot \"{action}\" {object}")?;
                if let Some(reason) = reason {
                    write!(f, " [{reason}]")?;
                }
                Ok(())
            }
            CheckError::InvalidState {
                object,
                expected,
                actual,
                reason,
            } => {
                if let Some(reason) = reason {
                    write!(f, "{reason}: ")?;
                }
                write!(
                    f,
                    "mutex \"{object}\" should be {expected}, but now is {actual}"
                )
            }
            CheckError::UnknownObject { name } => write!(f, "unknown object: {name}"),
            CheckError::UnknownMethod { name } => write!(f, "unknown method \"{name}\""),
        }
    }
}

/// One finding, positioned in a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub file: PathBuf,
    pub span: Span,
    pub error: CheckError,
}

impl Report {
    /// 1-based line of the finding.
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    /// 1-based column of the finding.
    pub fn column(&self) -> u32 {
        self.span.start.column + 1
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}:{}:{}",
            self.error,
            self.file.display(),
            self.line(),
            self.column()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_action_renderings() {
        let bare = CheckError::InvalidAction {
            subject: String::new(),
            object: "m".to_string(),
            action: LockAction::Unlock,
            reason: Some("not locked".to_string()),
        };
        assert_eq!(bare.to_string(), r#"cannot "unlock" m [not locked]"#);

        let no_reason = CheckError::InvalidAction {
            subject: String::new(),
            object: "t.mu".to_string(),
            action: LockAction::RLock,
            reason: None,
        };
        assert_eq!(no_reason.to_string(), r#"cannot "rlock" t.mu"#);
    }

    #[test]
    fn test_invalid_state_renderings() {
        let with_reason = CheckError::InvalidState {
            object: "t.m".to_string(),
            expected: LockState::RLocked,
            actual: LockState::Unlocked,
            reason: Some("in call to func3".to_string()),
        };
        assert_eq!(
            with_reason.to_string(),
            r#"in call to func3: mutex "t.m" should be rlocked, but now is unlocked"#
        );

        let without = CheckError::InvalidState {
            object: "t.m".to_string(),
            expected: LockState::Locked,
            actual: LockState::RLocked,
            reason: None,
        };
        assert_eq!(
            without.to_string(),
            r#"mutex "t.m" should be locked, but now is rlocked"#
        );
    }

    #[test]
    fn test_unknown_renderings() {
        assert_eq!(
            CheckError::UnknownObject {
                name: "mu".to_string()
            }
            .to_string(),
            "unknown object: mu"
        );
        assert_eq!(
            CheckError::UnknownMethod {
                name: "frobnicate".to_string()
            }
            .to_string(),
            r#"unknown method "frobnicate""#
        );
    }

    #[test]
    fn test_report_positions_are_one_based() {
        let report = Report {
            file: PathBuf::from("pkg/a.go"),
            span: Span::point(12, 4, 180),
            error: CheckError::UnknownObject {
                name: "mu".to_string(),
            },
        };
        assert_eq!(report.to_string(), "unknown object: mu: pkg/a.go:12:5");
    }
}
