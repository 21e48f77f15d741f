//! Scoped name resolution over a shared object arena.
//!
//! A resolver is a stack of lexical scopes mapping source names to
//! arena ids. Branching clones the scope stack but keeps the arena
//! handle, so sibling branches resolve pre-existing names to the same
//! ids while declarations made inside one branch stay invisible to the
//! others.

use std::cell::RefCell;
use std::rc::Rc;

use crate::features::objects::domain::ObjectArena;
use crate::features::syntax::ObjectPath;
use crate::shared::models::ObjectId;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct ObjectResolver {
    arena: Rc<RefCell<ObjectArena>>,
    scopes: Vec<FxHashMap<String, ObjectId>>,
}

impl Default for ObjectResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectResolver {
    pub fn new() -> Self {
        Self {
            arena: Rc::new(RefCell::new(ObjectArena::new())),
            scopes: vec![FxHashMap::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) {
        // The base scope stays; package-level names outlive any block.
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Bind `name` in the innermost scope, shadowing any outer binding.
    pub fn declare(&mut self, name: &str) -> ObjectId {
        let id = self.arena.borrow_mut().alloc();
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name.to_string(), id);
        id
    }

    /// Innermost binding for `name`, if any.
    pub fn resolve_name(&self, name: &str) -> Option<ObjectId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Resolve a full path without creating anything.
    pub fn resolve_path(&self, path: &ObjectPath) -> Option<ObjectId> {
        let mut segments = path.segments().iter();
        let mut id = self.resolve_name(segments.next()?)?;
        let arena = self.arena.borrow();
        for segment in segments {
            id = arena.field(id, segment)?;
        }
        Some(id)
    }

    /// Resolve a path, creating missing links under an already-known
    /// root. Returns `None` when the root name itself is unbound: a
    /// path can only grow from an object we have seen declared.
    pub fn add_path(&mut self, path: &ObjectPath) -> Option<ObjectId> {
        let mut segments = path.segments().iter();
        let mut id = self.resolve_name(segments.next()?)?;
        let mut arena = self.arena.borrow_mut();
        for segment in segments {
            id = arena.field_or_insert(id, segment);
        }
        Some(id)
    }

    /// Clone for a control-flow branch: same arena, own scope stack.
    pub fn branch(&self) -> ObjectResolver {
        ObjectResolver {
            arena: Rc::clone(&self.arena),
            scopes: self.scopes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> ObjectPath {
        ObjectPath::parse(text)
    }

    #[test]
    fn test_declare_and_resolve() {
        let mut resolver = ObjectResolver::new();
        let t = resolver.declare("t");
        assert_eq!(resolver.resolve_name("t"), Some(t));
        assert_eq!(resolver.resolve_name("u"), None);
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let mut resolver = ObjectResolver::new();
        let outer = resolver.declare("x");
        resolver.push_scope();
        let inner = resolver.declare("x");
        assert_ne!(outer, inner);
        assert_eq!(resolver.resolve_name("x"), Some(inner));
        resolver.pop_scope();
        assert_eq!(resolver.resolve_name("x"), Some(outer));
    }

    #[test]
    fn test_base_scope_survives_pop() {
        let mut resolver = ObjectResolver::new();
        resolver.declare("pkg");
        resolver.pop_scope();
        assert!(resolver.resolve_name("pkg").is_some());
    }

    #[test]
    fn test_add_path_requires_known_root() {
        let mut resolver = ObjectResolver::new();
        assert_eq!(resolver.add_path(&path("t.mu")), None);

        resolver.declare("t");
        let mu = resolver.add_path(&path("t.mu")).unwrap();
        assert_eq!(resolver.resolve_path(&path("t.mu")), Some(mu));
        // Second resolution reuses the link.
        assert_eq!(resolver.add_path(&path("t.mu")), Some(mu));
    }

    #[test]
    fn test_deep_path_created_level_by_level() {
        let mut resolver = ObjectResolver::new();
        resolver.declare("t");
        let inner = resolver.add_path(&path("t.state.mu")).unwrap();
        assert_eq!(resolver.resolve_path(&path("t.state.mu")), Some(inner));
        assert!(resolver.resolve_path(&path("t.state")).is_some());
        assert_eq!(resolver.resolve_path(&path("t.other")), None);
    }

    #[test]
    fn test_branch_shares_arena_but_not_new_bindings() {
        let mut resolver = ObjectResolver::new();
        let t = resolver.declare("t");
        let mu = resolver.add_path(&path("t.mu")).unwrap();

        let mut left = resolver.branch();
        let right = resolver.branch();

        // Pre-existing objects resolve identically in every branch.
        assert_eq!(left.resolve_name("t"), Some(t));
        assert_eq!(right.resolve_path(&path("t.mu")), Some(mu));

        // A declaration inside one branch is invisible to its sibling
        // and to the parent, but field links go through the shared
        // arena and stay stable.
        left.push_scope();
        left.declare("local");
        assert_eq!(right.resolve_name("local"), None);
        assert_eq!(resolver.resolve_name("local"), None);

        let deep = left.add_path(&path("t.other")).unwrap();
        assert_eq!(right.resolve_path(&path("t.other")), Some(deep));
    }
}
