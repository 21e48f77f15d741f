//! Flow shapes
//!
//! A [`Flow`] is the straightened control flow of one statement block:
//! a sequence of nodes, each holding straight-line statements followed
//! by an optional fork into branch sub-flows. Deferred calls collected
//! in a node replay at function exit in LIFO order.
//!
//! This is deliberately not a general CFG. Loops, switch and select
//! statements stay opaque statements inside a node (their bodies are
//! explored in fresh contexts); only if/else forks become branches,
//! because only those merge back into the same path.

use crate::features::syntax::Stmt;

/// How exploration of a flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Normal,
    Return,
    Panic,
}

impl ExitKind {
    pub fn is_normal(self) -> bool {
        matches!(self, ExitKind::Normal)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flow {
    pub nodes: Vec<FlowNode>,
}

impl Flow {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.statements.is_empty() && n.branches.is_empty() && n.defers.is_empty())
    }

    /// Total statement count, branches included (diagnostics only)
    pub fn statement_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|n| {
                n.statements.len()
                    + n.defers.len()
                    + n.branches
                        .iter()
                        .map(Flow::statement_count)
                        .sum::<usize>()
            })
            .sum()
    }
}

/// Straight-line statements, then an optional fork
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowNode {
    pub statements: Vec<Stmt>,
    /// Branch sub-flows; explored independently from this node's exit
    /// state and merged afterwards. Empty for non-forking nodes.
    pub branches: Vec<Flow>,
    /// Deferred call statements registered in this node, in source order
    pub defers: Vec<Stmt>,
}

impl FlowNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fork(&self) -> bool {
        !self.branches.is_empty()
    }
}
