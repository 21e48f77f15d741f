//! Flow walker
//!
//! Drives a visitor through a function body in evaluation order:
//! statements expand to operation chains, forks clone the context per
//! arm and merge the survivors, isolated regions (goroutines, loops,
//! case bodies, uncalled literals) walk in fresh contexts, and defers
//! replay last-in-first-out wherever their frame exits. Visitors never
//! see syntax, only accesses, lock actions and calls.

use crate::features::checking::domain::PathRun;
use crate::features::checking::infrastructure::context::{CheckContext, DeferItem};
use crate::features::checking::ports::OperationVisitor;
use crate::features::flow::{build_flow, ExitKind, Flow};
use crate::features::lock_protocol::{LockAction, LockStateMap};
use crate::features::operations::{expand_expr, expand_stmt, ExpandedStmt, Operation, OperationChain};
use crate::features::operations::domain::operation::ExecOp;
use crate::features::package_desc::{element_type, TypeCatalog};
use crate::features::syntax::domain::ast::{AssignStmt, ExprStmt, RangeStmt};
use crate::features::syntax::{Block, Expr, Stmt};

pub struct FlowWalker<'a, V: OperationVisitor> {
    visitor: &'a mut V,
    catalog: &'a TypeCatalog<'a>,
}

impl<'a, V: OperationVisitor> FlowWalker<'a, V> {
    pub fn new(visitor: &'a mut V, catalog: &'a TypeCatalog<'a>) -> Self {
        Self { visitor, catalog }
    }

    /// Walk one function (or function-literal) body as its own defer
    /// frame. A `return` inside is consumed here; a panic propagates to
    /// the caller's frame.
    pub fn walk_body(&mut self, ctx: &mut CheckContext, block: &Block) {
        let saved_pending = std::mem::take(&mut ctx.pending_defers);
        let saved_exit = ctx.exit;
        ctx.exit = ExitKind::Normal;

        let flow = build_flow(&block.stmts);
        self.walk_flow(ctx, &flow);
        if ctx.exit.is_normal() {
            self.replay_all(ctx);
        }
        if ctx.exit != ExitKind::Panic {
            ctx.exit = saved_exit;
        }
        ctx.pending_defers = saved_pending;
    }

    fn walk_flow(&mut self, ctx: &mut CheckContext, flow: &Flow) {
        for node in &flow.nodes {
            for defer in &node.defers {
                ctx.pending_defers.push(DeferItem::Call(defer.clone()));
            }
            for stmt in &node.statements {
                self.walk_stmt(ctx, stmt);
                if !ctx.exit.is_normal() {
                    // This path ends here; run its defers now.
                    self.replay_all(ctx);
                    return;
                }
            }
            if node.is_fork() {
                self.walk_fork(ctx, &node.branches);
                if !ctx.exit.is_normal() {
                    // Every arm ended its own path and already replayed
                    // its pending clone.
                    return;
                }
            }
        }
    }

    fn walk_fork(&mut self, ctx: &mut CheckContext, branches: &[Flow]) {
        let base_pending = ctx.pending_defers.len();
        let mut normal_states = Vec::new();
        let mut additions: Vec<Vec<DeferItem>> = Vec::new();
        let mut all_panic = !branches.is_empty();

        for branch in branches {
            let mut arm = ctx.branch_arm();
            arm.push_scope();
            self.walk_flow(&mut arm, branch);
            arm.pop_scope();
            ctx.reports.append(&mut arm.reports);
            match arm.exit {
                ExitKind::Normal => {
                    all_panic = false;
                    additions.push(arm.pending_defers.split_off(base_pending));
                    normal_states.push(arm.states);
                }
                ExitKind::Return => all_panic = false,
                ExitKind::Panic => {}
            }
        }

        if normal_states.is_empty() {
            // No arm falls through; whatever follows is unreachable.
            ctx.exit = if all_panic {
                ExitKind::Panic
            } else {
                ExitKind::Return
            };
            return;
        }

        ctx.states = LockStateMap::merge_all(&normal_states);
        if additions.iter().any(|a| !a.is_empty()) {
            ctx.pending_defers.push(DeferItem::Group(additions));
        }
    }

    // ── defers ─────────────────────────────────────────────────────

    fn replay_all(&mut self, ctx: &mut CheckContext) {
        while let Some(item) = ctx.pending_defers.pop() {
            self.replay_item(ctx, item);
        }
    }

    fn replay_item(&mut self, ctx: &mut CheckContext, item: DeferItem) {
        match item {
            DeferItem::Call(stmt) => self.walk_stmt(ctx, &stmt),
            DeferItem::Group(arms) => {
                let mut merged = Vec::new();
                for items in arms {
                    let mut arm = ctx.branch_arm();
                    for item in items.into_iter().rev() {
                        self.replay_item(&mut arm, item);
                    }
                    ctx.reports.append(&mut arm.reports);
                    merged.push(arm.states);
                }
                if !merged.is_empty() {
                    ctx.states = LockStateMap::merge_all(&merged);
                }
            }
        }
    }

    // ── statements ─────────────────────────────────────────────────

    fn walk_stmt(&mut self, ctx: &mut CheckContext, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(_) | Stmt::IncDec(_) | Stmt::Return(_) => {
                self.walk_expanded(ctx, expand_stmt(stmt));
                if matches!(stmt, Stmt::Return(_)) {
                    ctx.exit = ExitKind::Return;
                }
            }
            Stmt::Assign(assign) => {
                if assign.define {
                    self.declare_assign_targets(ctx, assign);
                }
                self.walk_expanded(ctx, expand_stmt(stmt));
            }
            Stmt::Var(var) => {
                let aligned = var.values.len() == var.names.len();
                for (i, name) in var.names.iter().enumerate() {
                    let value = var.values.get(if aligned { i } else { 0 });
                    let type_text = var
                        .type_text
                        .clone()
                        .or_else(|| value.and_then(|v| self.type_of_expr(ctx, v)));
                    ctx.declare_local(&name.name, type_text);
                }
                self.walk_expanded(ctx, expand_stmt(stmt));
            }
            // Ifs were consumed into fork nodes by flow construction.
            Stmt::If(_) => {}
            Stmt::For(for_stmt) => {
                let mut stmts = Vec::new();
                if let Some(init) = &for_stmt.init {
                    stmts.push((**init).clone());
                }
                if let Some(cond) = &for_stmt.cond {
                    stmts.push(Stmt::Expr(ExprStmt {
                        expr: cond.clone(),
                        span: cond.span(),
                    }));
                }
                stmts.extend(for_stmt.body.stmts.iter().cloned());
                if let Some(post) = &for_stmt.post {
                    stmts.push((**post).clone());
                }
                self.walk_isolated(ctx, &stmts);
            }
            Stmt::Range(range_stmt) => self.walk_range(ctx, range_stmt),
            Stmt::Switch(switch_stmt) => {
                ctx.push_scope();
                if let Some(init) = &switch_stmt.init {
                    self.walk_stmt(ctx, init);
                }
                if let Some(tag) = &switch_stmt.tag {
                    self.walk_expanded(ctx, expand_expr(tag));
                }
                for case in &switch_stmt.cases {
                    for expr in &case.exprs {
                        self.walk_expanded(ctx, expand_expr(expr));
                    }
                    self.walk_isolated(ctx, &case.body);
                }
                ctx.pop_scope();
            }
            Stmt::Select(select_stmt) => {
                for case in &select_stmt.cases {
                    let mut stmts = Vec::new();
                    if let Some(comm) = &case.comm {
                        stmts.push((**comm).clone());
                    }
                    stmts.extend(case.body.iter().cloned());
                    self.walk_isolated(ctx, &stmts);
                }
            }
            Stmt::Go(go_stmt) => {
                let call = Stmt::Expr(ExprStmt {
                    expr: go_stmt.call.clone(),
                    span: go_stmt.span,
                });
                self.walk_isolated(ctx, std::slice::from_ref(&call));
            }
            Stmt::Defer(defer_stmt) => {
                ctx.pending_defers.push(DeferItem::Call(Stmt::Expr(ExprStmt {
                    expr: defer_stmt.call.clone(),
                    span: defer_stmt.span,
                })));
            }
            Stmt::Block(block) => {
                ctx.push_scope();
                let flow = build_flow(&block.stmts);
                self.walk_flow(ctx, &flow);
                ctx.pop_scope();
            }
            Stmt::Other(_) => {}
        }
    }

    /// Statements walked in a fresh context: lock effects and defers
    /// stay local, findings flow back.
    fn walk_isolated(&mut self, ctx: &mut CheckContext, stmts: &[Stmt]) {
        let mut inner = ctx.fresh();
        inner.push_scope();
        let flow = build_flow(stmts);
        self.walk_flow(&mut inner, &flow);
        if inner.exit.is_normal() {
            self.replay_all(&mut inner);
        }
        inner.pop_scope();
        ctx.reports.append(&mut inner.reports);
    }

    fn walk_range(&mut self, ctx: &mut CheckContext, range_stmt: &RangeStmt) {
        let mut inner = ctx.fresh();
        inner.push_scope();
        self.walk_expanded(&mut inner, expand_expr(&range_stmt.expr));
        let container = self.type_of_expr(&inner, &range_stmt.expr);
        if let Some(key) = &range_stmt.key {
            inner.declare_local(&key.name, None);
        }
        if let Some(value) = &range_stmt.value {
            let elem = container.as_deref().and_then(element_type);
            inner.declare_local(&value.name, elem);
        }
        let flow = build_flow(&range_stmt.body.stmts);
        self.walk_flow(&mut inner, &flow);
        if inner.exit.is_normal() {
            self.replay_all(&mut inner);
        }
        inner.pop_scope();
        ctx.reports.append(&mut inner.reports);
    }

    fn declare_assign_targets(&mut self, ctx: &mut CheckContext, assign: &AssignStmt) {
        let aligned = assign.rhs.len() == assign.lhs.len();
        for (i, target) in assign.lhs.iter().enumerate() {
            let Expr::Ident(ident) = target else { continue };
            let type_text = if aligned {
                assign
                    .rhs
                    .get(i)
                    .and_then(|value| self.type_of_expr(ctx, value))
            } else {
                None
            };
            ctx.declare_local(&ident.name, type_text);
        }
    }

    // ── operations ─────────────────────────────────────────────────

    fn walk_expanded(&mut self, ctx: &mut CheckContext, expanded: ExpandedStmt) {
        for chain in &expanded.chains {
            if !ctx.exit.is_normal() {
                return;
            }
            self.walk_chain(ctx, chain);
        }
        for body in &expanded.funclit_bodies {
            self.explore_funclit(ctx, body);
        }
    }

    /// A literal that is not called where it appears still gets its
    /// body checked, in isolation.
    fn explore_funclit(&mut self, ctx: &mut CheckContext, body: &Block) {
        let mut inner = ctx.fresh();
        inner.push_scope();
        self.walk_body(&mut inner, body);
        inner.pop_scope();
        ctx.reports.append(&mut inner.reports);
    }

    fn walk_chain(&mut self, ctx: &mut CheckContext, chain: &OperationChain) {
        let mut run = PathRun::new();
        self.walk_ops(ctx, &chain.ops, &mut run);
    }

    fn walk_ops(&mut self, ctx: &mut CheckContext, ops: &[Operation], run: &mut PathRun) {
        for op in ops {
            if !ctx.exit.is_normal() {
                return;
            }
            match op {
                Operation::Read(read) => {
                    run.push(&read.name);
                    self.visitor.on_access(ctx, run, read.span);
                }
                Operation::Exec(exec) => self.walk_exec(ctx, exec, run),
                Operation::Index(index) => {
                    self.walk_chain(ctx, &index.index);
                    self.walk_ops(ctx, &index.x.ops, run);
                    if !run.is_empty() {
                        run.index_last(&index.index_text);
                        self.visitor.on_access(ctx, run, index.span);
                    }
                }
                Operation::Deref(deref) => {
                    self.walk_ops(ctx, &deref.x.ops, run);
                }
                Operation::Write(write) => {
                    let mut target = PathRun::new();
                    self.walk_ops(ctx, &write.lhs.ops, &mut target);
                    run.reset();
                }
                Operation::New(new) => {
                    for init in &new.inits {
                        self.walk_chain(ctx, init);
                    }
                    run.reset();
                }
            }
        }
    }

    fn walk_exec(&mut self, ctx: &mut CheckContext, exec: &ExecOp, run: &mut PathRun) {
        for arg in &exec.args {
            self.walk_chain(ctx, arg);
        }
        if let Some(body) = &exec.body {
            // Immediately invoked literal: its effects land here.
            run.reset();
            ctx.push_scope();
            self.walk_body(ctx, body);
            ctx.pop_scope();
            return;
        }
        if let Some(action) = LockAction::from_method(&exec.name) {
            if !run.is_empty() {
                self.visitor.on_action(ctx, run, action, exec.span);
                run.reset();
                return;
            }
        } else if exec.name == "panic" && run.is_empty() {
            ctx.exit = ExitKind::Panic;
            return;
        }
        self.visitor.on_call(ctx, run, &exec.name, exec.span);
        run.push_call(&exec.name);
    }

    // ── syntactic types ────────────────────────────────────────────

    /// Declared type of an expression, folded through the catalog.
    /// Purely syntactic; `None` whenever the source does not spell it.
    fn type_of_expr(&self, ctx: &CheckContext, expr: &Expr) -> Option<String> {
        match expr {
            Expr::Ident(ident) => self.binding_type(ctx, &ident.name),
            Expr::Selector(sel) => {
                let base = self.type_of_expr(ctx, &sel.x)?;
                self.catalog.path_type(&base, &[sel.sel.name.clone()])
            }
            Expr::Call(call) => match call.func.as_ref() {
                Expr::Ident(func) if func.name == "new" => match call.args.first() {
                    Some(arg @ (Expr::Ident(_) | Expr::Selector(_))) => {
                        Some(format!("*{}", arg.text()))
                    }
                    _ => None,
                },
                Expr::Selector(sel) => {
                    let base = self.type_of_expr(ctx, &sel.x)?;
                    self.catalog.path_type(&base, &[format!("{}()", sel.sel.name)])
                }
                _ => None,
            },
            Expr::Index(index) => {
                let container = self.type_of_expr(ctx, &index.x)?;
                element_type(&container)
            }
            Expr::Star(star) => self
                .type_of_expr(ctx, &star.x)
                .map(|t| t.trim_start_matches('*').to_string()),
            Expr::Unary(unary) if unary.op == "&" => {
                self.type_of_expr(ctx, &unary.x).map(|t| format!("*{t}"))
            }
            Expr::Composite(lit) => lit.type_text.clone(),
            _ => None,
        }
    }

    fn binding_type(&self, ctx: &CheckContext, name: &str) -> Option<String> {
        if let Some(t) = ctx.local_type(name) {
            return Some(t.to_string());
        }
        self.catalog
            .desc()
            .var(name)
            .and_then(|v| v.type_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::features::package_desc::{describe, PackageDesc};
    use crate::features::parsing::parse_go_source;
    use crate::features::syntax::{Decl, GoFile};
    use crate::shared::models::Span;
    use std::path::PathBuf;

    /// Visitor that records the event stream.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl OperationVisitor for Recorder {
        fn on_access(&mut self, _ctx: &mut CheckContext, run: &PathRun, _span: Span) {
            self.events.push(format!("access {}", run.text()));
        }

        fn on_action(
            &mut self,
            _ctx: &mut CheckContext,
            run: &PathRun,
            action: LockAction,
            _span: Span,
        ) {
            self.events.push(format!("{action} {}", run.text()));
        }

        fn on_call(&mut self, _ctx: &mut CheckContext, run: &PathRun, name: &str, _span: Span) {
            if run.is_empty() {
                self.events.push(format!("call {name}"));
            } else {
                self.events.push(format!("call {}.{name}", run.text()));
            }
        }
    }

    fn parse(source: &str) -> GoFile {
        parse_go_source(source, PathBuf::from("walker_test.go")).unwrap()
    }

    fn record(source: &str) -> Vec<String> {
        let file = parse(source);
        let desc = describe(std::slice::from_ref(&file), "locklint:");
        record_with(&file, &desc)
    }

    fn record_with(file: &GoFile, desc: &PackageDesc) -> Vec<String> {
        let cfg = AnalyzerConfig::default();
        let catalog = TypeCatalog::new(desc, &cfg.lock_types);
        let mut recorder = Recorder::default();
        for decl in &file.decls {
            let Decl::Func(func) = decl else { continue };
            let Some(body) = &func.body else { continue };
            let mut ctx = CheckContext::for_function(file.path.clone(), func, desc);
            let mut walker = FlowWalker::new(&mut recorder, &catalog);
            walker.walk_body(&mut ctx, body);
        }
        recorder.events
    }

    #[test]
    fn test_chain_events_in_evaluation_order() {
        let events = record(
            r#"package demo

func f(t *Tree) {
	t.mu.Lock()
	t.count++
	t.helper(t.x)
}
"#,
        );
        assert_eq!(
            events,
            vec![
                "access t",
                "access t.mu",
                "lock t.mu",
                "access t",
                "access t.count",
                "access t",
                "access t",
                "access t.x",
                "call t.helper",
            ]
        );
    }

    #[test]
    fn test_defer_replays_at_exit() {
        let events = record(
            r#"package demo

func f(t *Tree) {
	t.mu.Lock()
	defer t.mu.Unlock()
	t.step()
}
"#,
        );
        assert_eq!(
            events,
            vec![
                "access t",
                "access t.mu",
                "lock t.mu",
                "access t",
                "call t.step",
                "access t",
                "access t.mu",
                "unlock t.mu",
            ]
        );
    }

    #[test]
    fn test_defer_replays_before_early_return() {
        let events = record(
            r#"package demo

func f(t *Tree) {
	defer t.mu.Unlock()
	if t.done {
		return
	}
	t.step()
}
"#,
        );
        // The then-arm return replays the pending unlock; the fall
        // through path replays it again at function end.
        let unlocks = events.iter().filter(|e| *e == "unlock t.mu").count();
        assert_eq!(unlocks, 2, "{events:?}");
    }

    #[test]
    fn test_goroutine_is_isolated_but_visited() {
        let events = record(
            r#"package demo

func f(t *Tree) {
	go func() {
		t.mu.Lock()
		t.mu.Unlock()
	}()
	t.step()
}
"#,
        );
        assert!(events.contains(&"lock t.mu".to_string()), "{events:?}");
        assert!(events.contains(&"call t.step".to_string()), "{events:?}");
    }

    #[test]
    fn test_iife_runs_inline() {
        let events = record(
            r#"package demo

func f(t *Tree) {
	func() {
		t.mu.Lock()
	}()
	t.step()
}
"#,
        );
        assert_eq!(
            events,
            vec!["access t", "access t.mu", "lock t.mu", "access t", "call t.step"]
        );
    }

    #[test]
    fn test_panic_cuts_the_path() {
        let events = record(
            r#"package demo

func f(t *Tree) {
	panic("boom")
	t.step()
}
"#,
        );
        // The literal argument yields no reads and everything after the
        // panic is unreachable.
        assert!(events.is_empty(), "{events:?}");
    }
}
