/*
 * Checking
 *
 * The analysis engine proper. A flow walker drives pluggable checkers
 * through each function body in evaluation order, forking per branch
 * arm and replaying defers at frame exit; the contract checker enforces
 * annotation discipline by name, the usage checker enforces the raw
 * lock protocol by declared type. Findings come out as ordered reports.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{run_checkers, sort_reports};
pub use domain::{CheckError, PathRun, Report};
pub use infrastructure::{CheckContext, ContractChecker, FlowWalker, UsageChecker};
pub use ports::{Checker, OperationVisitor};
