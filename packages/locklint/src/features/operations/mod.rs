/*
 * Operations
 *
 * Flat operation chains distilled from expressions:
 * - Read / Write / Exec / Index / Deref / New
 * - Chains are in evaluation order; assignments emit RHS chains before
 *   the write
 * - flatten() splices nested index/deref operand chains for chain-level
 *   inspection
 *
 * Architecture:
 * - Domain: Operation, OperationChain
 * - Application: statement/expression expander (also surfaces uncalled
 *   function-literal bodies for fresh-context exploration)
 */

pub mod application;
pub mod domain;

// Re-export main types
pub use application::{expand_expr, expand_stmt, ExpandedStmt};
pub use domain::{Operation, OperationChain};
