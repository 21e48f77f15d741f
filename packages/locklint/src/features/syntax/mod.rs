/*
 * Go Syntax Subset
 *
 * Closed syntax tree for the Go constructs the checkers interpret:
 * - Declarations: functions/methods (with receiver), struct types,
 *   package variables
 * - Statements: expression, assignment, var, return, if/else, for,
 *   range, switch, select, go, defer, nested blocks
 * - Expressions: identifiers, selectors, calls, index, deref, unary,
 *   binary, composite literals, function literals, basic literals
 *
 * Anything outside the subset lowers to an opaque Other node that the
 * walkers skip. Doc comments travel with declarations and fields; they
 * carry lock annotations.
 *
 * Architecture:
 * - Domain: tree types, dotted object paths
 * (no application/infrastructure; the parsing feature produces these
 * trees)
 */

pub mod domain;

// Re-export main types
pub use domain::{Block, Decl, Expr, FuncDecl, GoFile, Ident, ObjectPath, Stmt};
