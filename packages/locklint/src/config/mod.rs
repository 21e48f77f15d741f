//! Analyzer configuration
//!
//! Everything a run can be tuned with: which checkers execute, which
//! type names count as locks, the annotation tag, and source-selection
//! knobs. Values come from CLI flags or a JSON config file; either way
//! they end up in one [`AnalyzerConfig`] passed through the pipeline.

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{LocklintError, Result};
use crate::features::annotations::DEFAULT_TAG;

/// Type names treated as locks when no override is given.
pub static DEFAULT_LOCK_TYPES: Lazy<Vec<String>> =
    Lazy::new(|| vec!["sync.Mutex".to_string(), "sync.RWMutex".to_string()]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CheckerKind {
    /// Annotation-driven checking of declared lock contracts
    Contracts,
    /// Type-driven checking of raw lock call sequences
    Usage,
}

impl CheckerKind {
    pub fn all() -> Vec<CheckerKind> {
        vec![CheckerKind::Contracts, CheckerKind::Usage]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Type names whose values are lock objects
    pub lock_types: Vec<String>,
    /// Checkers to run, in order
    pub checkers: Vec<CheckerKind>,
    /// Also analyze `*_test.go` files
    pub include_tests: bool,
    /// Doc-comment tag that introduces lock annotations
    pub annotation_tag: String,
    /// Restrict checking to the function with this exact name
    pub filter: Option<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lock_types: DEFAULT_LOCK_TYPES.clone(),
            checkers: CheckerKind::all(),
            include_tests: false,
            annotation_tag: DEFAULT_TAG.to_string(),
            filter: None,
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a JSON file. Missing fields fall back
    /// to their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| LocklintError::config(format!("{}: {e}", path.display())))
    }

    /// Whether `name` passes the function filter.
    pub fn wants_function(&self, name: &str) -> bool {
        match &self.filter {
            Some(filter) => filter == name,
            None => true,
        }
    }
}
