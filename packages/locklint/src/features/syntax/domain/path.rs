//! Dotted object paths
//!
//! A path names an object the way source text does: `t.mu`,
//! `t.registry[name]`, `t.getM()`. Segments after the root may be plain
//! field names, call segments (`getM()`) or index segments
//! (`locks[key]`). Paths are how annotations, guard requirements and
//! lock operations all refer to objects before resolution assigns ids.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ObjectPath {
    segments: Vec<String>,
}

impl ObjectPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Parse a dot-separated path: `t.mu` -> [t, mu]
    pub fn parse(text: &str) -> Self {
        Self {
            segments: text
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn root(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Rewrite the last segment in place (used to turn `m` into `m[key]`
    /// when an index is applied to the path so far)
    pub fn replace_last(&mut self, segment: impl Into<String>) {
        if let Some(last) = self.segments.last_mut() {
            *last = segment.into();
        } else {
            self.segments.push(segment.into());
        }
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    /// Copy of this path with the root segment replaced. Used when a
    /// callee's annotation (`recv.mu.Lock`) is re-rooted onto the caller's
    /// receiver expression.
    pub fn with_root(&self, root: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        if segments.is_empty() {
            segments.push(root.into());
        } else {
            segments[0] = root.into();
        }
        Self { segments }
    }

    /// Copy of this path with an extra leading segment. Used to qualify a
    /// field-relative guard (`mu`) with the receiver name (`t.mu`).
    pub fn prefixed(&self, root: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.push(root.into());
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    pub fn text(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl From<Vec<String>> for ObjectPath {
    fn from(segments: Vec<String>) -> Self {
        Self::from_segments(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_text_round() {
        let p = ObjectPath::parse("t.mu.inner");
        assert_eq!(p.segments(), &["t", "mu", "inner"]);
        assert_eq!(p.text(), "t.mu.inner");
    }

    #[test]
    fn test_with_root_rewrites_first_segment() {
        let p = ObjectPath::parse("recv.mu");
        assert_eq!(p.with_root("t").text(), "t.mu");
    }

    #[test]
    fn test_prefixed_qualifies_relative_guard() {
        let p = ObjectPath::parse("mu");
        assert_eq!(p.prefixed("t").text(), "t.mu");
    }

    #[test]
    fn test_replace_last_builds_index_segment() {
        let mut p = ObjectPath::parse("t.locks");
        p.replace_last("locks[key]");
        assert_eq!(p.text(), "t.locks[key]");
    }
}
