//! Usage checker
//!
//! Type-driven protocol tracking. Where the contract checker believes
//! names, this one believes types: a `Lock`/`Unlock` call only counts
//! when the receiver path resolves, through the package's declared
//! types, to a configured lock type. No annotations are consulted, so
//! the findings are limited to raw protocol violations, but they cover
//! unannotated code and ignore unrelated types that happen to export a
//! `Lock` method.

use crate::config::AnalyzerConfig;
use crate::features::checking::domain::{CheckError, PathRun, Report};
use crate::features::checking::infrastructure::context::CheckContext;
use crate::features::checking::infrastructure::walker::FlowWalker;
use crate::features::checking::ports::{Checker, OperationVisitor};
use crate::features::lock_protocol::LockAction;
use crate::features::package_desc::{element_type, TypeCatalog};
use crate::features::syntax::{Decl, GoFile};
use crate::shared::models::Span;

pub struct UsageChecker;

impl Checker for UsageChecker {
    fn name(&self) -> &'static str {
        "usage"
    }

    fn check_file(
        &self,
        file: &GoFile,
        catalog: &TypeCatalog<'_>,
        cfg: &AnalyzerConfig,
    ) -> Vec<Report> {
        let mut reports = Vec::new();
        for decl in &file.decls {
            let Decl::Func(func) = decl else { continue };
            let Some(body) = &func.body else { continue };
            if !cfg.wants_function(&func.name.name) {
                continue;
            }
            let mut ctx = CheckContext::for_function(file.path.clone(), func, catalog.desc());
            let mut visitor = UsageVisitor { catalog };
            let mut walker = FlowWalker::new(&mut visitor, catalog);
            walker.walk_body(&mut ctx, body);
            reports.append(&mut ctx.reports);
        }
        reports
    }
}

struct UsageVisitor<'a> {
    catalog: &'a TypeCatalog<'a>,
}

impl UsageVisitor<'_> {
    /// Declared type of the object the run names, if the source spells
    /// one out. An indexed root (`locks[k]`) types as the container's
    /// element.
    fn run_type(&self, ctx: &CheckContext, run: &PathRun) -> Option<String> {
        let root = run.root()?;
        let (base, indexed) = match root.find('[') {
            Some(pos) => (&root[..pos], true),
            None => (root, false),
        };
        let mut current = match ctx.local_type(base) {
            Some(t) => t.to_string(),
            None => self.catalog.desc().var(base)?.type_text.clone()?,
        };
        if indexed {
            current = element_type(&current)?;
        }
        self.catalog.path_type(&current, &run.path().segments()[1..])
    }
}

impl OperationVisitor for UsageVisitor<'_> {
    fn on_action(&mut self, ctx: &mut CheckContext, run: &PathRun, action: LockAction, span: Span) {
        let Some(object_type) = self.run_type(ctx, run) else {
            return;
        };
        if !self.catalog.is_lock_type(&object_type) {
            return;
        }
        let id = match ctx.resolver.add_path(run.path()) {
            Some(id) => id,
            None => {
                // Indexed roots have no scope binding of their own;
                // track them by their spelled path.
                let Some(root) = run.root() else { return };
                ctx.resolver.declare(root);
                match ctx.resolver.add_path(run.path()) {
                    Some(id) => id,
                    None => return,
                }
            }
        };
        if let Some(reason) = ctx.apply_action(id, action) {
            ctx.report(
                CheckError::InvalidAction {
                    subject: String::new(),
                    object: run.text(),
                    action,
                    reason: Some(reason.to_string()),
                },
                span,
            );
        }
    }
}
