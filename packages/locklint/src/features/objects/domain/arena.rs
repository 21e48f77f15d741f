//! Object arena
//!
//! Append-only store of tracked objects. An object is nothing but an
//! id plus a table of named children (fields, call segments, index
//! segments); identity is what the lock-state map keys on. The arena
//! never forgets an object, so ids handed out before a control-flow
//! fork stay valid in every branch.

use crate::shared::models::ObjectId;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
struct ObjectEntry {
    fields: FxHashMap<String, ObjectId>,
}

#[derive(Debug, Default)]
pub struct ObjectArena {
    entries: Vec<ObjectEntry>,
}

impl ObjectArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh object
    pub fn alloc(&mut self) -> ObjectId {
        let id = ObjectId(self.entries.len() as u32);
        self.entries.push(ObjectEntry::default());
        id
    }

    /// Child of `id` named `segment`, if one was ever created
    pub fn field(&self, id: ObjectId, segment: &str) -> Option<ObjectId> {
        self.entries
            .get(id.index())
            .and_then(|entry| entry.fields.get(segment).copied())
    }

    /// Child of `id` named `segment`, creating it on first use
    pub fn field_or_insert(&mut self, id: ObjectId, segment: &str) -> ObjectId {
        if let Some(existing) = self.field(id, segment) {
            return existing;
        }
        let child = self.alloc();
        self.entries[id.index()]
            .fields
            .insert(segment.to_string(), child);
        child
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_is_sequential() {
        let mut arena = ObjectArena::new();
        assert_eq!(arena.alloc(), ObjectId(0));
        assert_eq!(arena.alloc(), ObjectId(1));
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_field_or_insert_is_stable() {
        let mut arena = ObjectArena::new();
        let root = arena.alloc();
        let a = arena.field_or_insert(root, "mu");
        let b = arena.field_or_insert(root, "mu");
        assert_eq!(a, b);
        assert_eq!(arena.field(root, "mu"), Some(a));
        assert_eq!(arena.field(root, "other"), None);
    }
}
