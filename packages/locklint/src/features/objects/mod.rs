/*
 * Object identity
 *
 * Maps source-level access paths ("t.mu", "c.shards[k].mu") onto
 * stable object ids so the checkers can key lock state on identity
 * rather than on spelling. The arena owns the objects; resolvers are
 * cheap scoped views that branch alongside control flow.
 */

pub mod domain;
pub mod infrastructure;

pub use domain::ObjectArena;
pub use infrastructure::ObjectResolver;
