//! Per-function checking context
//!
//! Carries everything that changes as the walk advances: the name
//! resolver, the lock-state map, declared types of locals, the stack
//! of pending defers, the exit kind, and the findings so far. Contexts
//! fork at control-flow splits and for isolated regions (goroutines,
//! loop bodies, case bodies); the two constructors below are the two
//! flavors of fork.

use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::features::checking::domain::{CheckError, Report};
use crate::features::flow::ExitKind;
use crate::features::lock_protocol::{LockAction, LockStateMap};
use crate::features::objects::ObjectResolver;
use crate::features::package_desc::PackageDesc;
use crate::features::syntax::{FuncDecl, Stmt};
use crate::shared::models::{ObjectId, Span};

/// A deferred piece of work, replayed last-in-first-out when its
/// frame exits.
#[derive(Debug, Clone)]
pub enum DeferItem {
    /// One deferred call statement
    Call(Stmt),
    /// Defers registered inside the arms of a fork, one list per arm
    /// that completed normally; replay forks the state again.
    Group(Vec<Vec<DeferItem>>),
}

#[derive(Debug)]
pub struct CheckContext {
    pub resolver: ObjectResolver,
    pub states: LockStateMap,
    /// Declared type text of named bindings, innermost scope last;
    /// kept in lockstep with the resolver's scopes.
    pub local_types: Vec<FxHashMap<String, String>>,
    pub pending_defers: Vec<DeferItem>,
    pub exit: ExitKind,
    pub reports: Vec<Report>,
    pub file: PathBuf,
}

impl CheckContext {
    pub fn new(file: PathBuf) -> Self {
        Self {
            resolver: ObjectResolver::new(),
            states: LockStateMap::new(),
            local_types: vec![FxHashMap::default()],
            pending_defers: Vec::new(),
            exit: ExitKind::Normal,
            reports: Vec::new(),
            file,
        }
    }

    /// Context positioned at the entry of `func`: package-level vars in
    /// the base scope, receiver and parameters in the function scope.
    pub fn for_function(file: PathBuf, func: &FuncDecl, desc: &PackageDesc) -> Self {
        let mut ctx = Self::new(file);
        for (name, var) in &desc.vars {
            ctx.declare_local(name, var.type_text.clone());
        }
        ctx.push_scope();
        if let Some(recv) = &func.receiver {
            if let Some(name) = &recv.name {
                ctx.declare_local(&name.name, Some(recv.type_name.clone()));
            }
        }
        for param in &func.params {
            for name in &param.names {
                ctx.declare_local(&name.name, Some(param.type_text.clone()));
            }
        }
        ctx
    }

    // ── scope management ───────────────────────────────────────────

    pub fn push_scope(&mut self) {
        self.resolver.push_scope();
        self.local_types.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        self.resolver.pop_scope();
        if self.local_types.len() > 1 {
            self.local_types.pop();
        }
    }

    /// Declare a binding in the innermost scope. The blank identifier
    /// is never tracked.
    pub fn declare_local(&mut self, name: &str, type_text: Option<String>) -> Option<ObjectId> {
        if name == "_" {
            return None;
        }
        let id = self.resolver.declare(name);
        if let Some(type_text) = type_text {
            if let Some(layer) = self.local_types.last_mut() {
                layer.insert(name.to_string(), type_text);
            }
        }
        Some(id)
    }

    /// Declared type of `name`, innermost scope first.
    pub fn local_type(&self, name: &str) -> Option<&str> {
        self.local_types
            .iter()
            .rev()
            .find_map(|layer| layer.get(name).map(String::as_str))
    }

    // ── forking ────────────────────────────────────────────────────

    /// Fork for one arm of a control-flow split: state and pending
    /// defers are carried in (an arm that returns replays them), new
    /// reports start empty.
    pub fn branch_arm(&self) -> CheckContext {
        CheckContext {
            resolver: self.resolver.branch(),
            states: self.states.clone(),
            local_types: self.local_types.clone(),
            pending_defers: self.pending_defers.clone(),
            exit: ExitKind::Normal,
            reports: Vec::new(),
            file: self.file.clone(),
        }
    }

    /// Fork for an isolated region (goroutine body, loop, case body,
    /// uncalled function literal): names still resolve, but lock state
    /// and defers start from nothing.
    pub fn fresh(&self) -> CheckContext {
        CheckContext {
            resolver: self.resolver.branch(),
            states: LockStateMap::new(),
            local_types: self.local_types.clone(),
            pending_defers: Vec::new(),
            exit: ExitKind::Normal,
            reports: Vec::new(),
            file: self.file.clone(),
        }
    }

    // ── findings ───────────────────────────────────────────────────

    pub fn report(&mut self, error: CheckError, span: Span) {
        self.reports.push(Report {
            file: self.file.clone(),
            span,
            error,
        });
    }

    /// Apply a lock action to `id`, returning the protocol complaint
    /// if the transition was illegal.
    pub fn apply_action(&mut self, id: ObjectId, action: LockAction) -> Option<&'static str> {
        self.states.apply(id, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::lock_protocol::LockState;

    #[test]
    fn test_scopes_keep_types_in_lockstep() {
        let mut ctx = CheckContext::new(PathBuf::from("ctx_test.go"));
        ctx.declare_local("t", Some("*Tree".to_string()));
        ctx.push_scope();
        ctx.declare_local("t", Some("*Shadow".to_string()));
        assert_eq!(ctx.local_type("t"), Some("*Shadow"));
        ctx.pop_scope();
        assert_eq!(ctx.local_type("t"), Some("*Tree"));
    }

    #[test]
    fn test_blank_identifier_not_declared() {
        let mut ctx = CheckContext::new(PathBuf::from("ctx_test.go"));
        assert!(ctx.declare_local("_", None).is_none());
        assert!(ctx.resolver.resolve_name("_").is_none());
    }

    #[test]
    fn test_branch_arm_carries_state_fresh_drops_it() {
        let mut ctx = CheckContext::new(PathBuf::from("ctx_test.go"));
        let id = ctx.declare_local("mu", None).unwrap();
        ctx.states.set(id, LockState::Locked);
        ctx.pending_defers.push(DeferItem::Call(Stmt::Other(
            crate::shared::models::Span::zero(),
        )));

        let arm = ctx.branch_arm();
        assert_eq!(arm.states.state(id), LockState::Locked);
        assert_eq!(arm.pending_defers.len(), 1);

        let fresh = ctx.fresh();
        assert_eq!(fresh.states.state(id), LockState::Unlocked);
        assert!(fresh.pending_defers.is_empty());
        // Names still resolve in the fresh context.
        assert_eq!(fresh.resolver.resolve_name("mu"), Some(id));
    }
}
