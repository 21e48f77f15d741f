/*
 * Parsing
 *
 * tree-sitter based Go front end. Produces the crate's Go-subset
 * syntax tree with doc comments attached, or a parse error naming the
 * first offending positions. Analysis never runs on broken input.
 */

pub mod application;
pub mod infrastructure;

pub use application::parse_go_source;
pub use infrastructure::GoParser;
