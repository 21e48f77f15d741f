/*
 * Control Flow
 *
 * Straightened flow representation for one function body:
 * - FlowNode: straight-line statements + optional if/else fork +
 *   deferred calls
 * - Branch arms merge back (fork/merge); an if without else carries an
 *   explicit empty arm so the skip path participates in the merge
 * - ExitKind: how a path ended (normal, return, panic)
 *
 * Architecture:
 * - Domain: Flow, FlowNode, ExitKind
 * - Application: builder from syntax statement blocks
 */

pub mod application;
pub mod domain;

// Re-export main types
pub use application::build_flow;
pub use domain::{ExitKind, Flow, FlowNode};
