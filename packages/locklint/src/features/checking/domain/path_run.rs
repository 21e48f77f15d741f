//! Current access path during a chain walk.
//!
//! As the walker steps through an operation chain it grows one run:
//! reads append segments, getter calls append `name()` segments, index
//! operations rewrite the last segment to `name[expr]`, and anything
//! that yields a fresh value (a lock action, a write, an unknown call
//! result being discarded) resets it.

use crate::features::syntax::ObjectPath;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRun {
    path: ObjectPath,
}

impl PathRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: &str) {
        self.path.push(segment);
    }

    /// Append a call segment: `get` becomes `get()`.
    pub fn push_call(&mut self, name: &str) {
        self.path.push(&format!("{name}()"));
    }

    /// Rewrite the last segment with an index suffix: `locks` becomes
    /// `locks[key]`.
    pub fn index_last(&mut self, index_text: &str) {
        if let Some(last) = self.path.last() {
            let indexed = format!("{last}[{index_text}]");
            self.path.replace_last(&indexed);
        }
    }

    pub fn reset(&mut self) {
        self.path.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    pub fn root(&self) -> Option<&str> {
        self.path.root()
    }

    pub fn text(&self) -> String {
        self.path.text()
    }
}
