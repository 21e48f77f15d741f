//! Checking ports
//!
//! [`Checker`] is the unit the runner schedules: one strategy applied
//! to one file. [`OperationVisitor`] is how a strategy observes the
//! shared flow walk; the walker owns traversal order, context forking
//! and defer replay, the visitor owns what any of it means.

use crate::config::AnalyzerConfig;
use crate::features::checking::domain::{PathRun, Report};
use crate::features::checking::infrastructure::CheckContext;
use crate::features::lock_protocol::LockAction;
use crate::features::package_desc::TypeCatalog;
use crate::features::syntax::GoFile;
use crate::shared::models::Span;

pub trait Checker {
    fn name(&self) -> &'static str;

    fn check_file(
        &self,
        file: &GoFile,
        catalog: &TypeCatalog<'_>,
        cfg: &AnalyzerConfig,
    ) -> Vec<Report>;
}

#[allow(unused_variables)]
pub trait OperationVisitor {
    /// A value was read through `run` (field selection, index, or the
    /// target of a write).
    fn on_access(&mut self, ctx: &mut CheckContext, run: &PathRun, span: Span) {}

    /// A lock method fired on the object named by `run`.
    fn on_action(&mut self, ctx: &mut CheckContext, run: &PathRun, action: LockAction, span: Span);

    /// A non-lock call; `run` holds the receiver path and is empty for
    /// free functions.
    fn on_call(&mut self, ctx: &mut CheckContext, run: &PathRun, name: &str, span: Span) {}
}
