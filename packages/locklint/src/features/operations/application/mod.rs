//! Operation expansion use cases

pub mod expander;

pub use expander::{expand_expr, expand_stmt, ExpandedStmt};
