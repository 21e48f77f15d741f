//! Contract checker
//!
//! Name-driven checking of declared lock discipline. Any method named
//! `Lock`/`RLock`/`Unlock`/`RUnlock` is treated as a lock action on its
//! receiver path, whatever its type. On top of raw protocol tracking
//! this checker enforces the package's annotations:
//!
//!   * a function annotated with a hold must not re-acquire that lock,
//!   * calls into annotated functions and methods need the declared
//!     states established, statically (caller's own annotations) or
//!     dynamically (tracked state),
//!   * guarded fields and package variables may only be touched with
//!     their lock held.

use rustc_hash::FxHashMap;
use tracing::warn;

use crate::config::AnalyzerConfig;
use crate::features::annotations::{Annotation, AnnotationKind};
use crate::features::checking::domain::{CheckError, PathRun, Report};
use crate::features::checking::infrastructure::context::CheckContext;
use crate::features::checking::infrastructure::walker::FlowWalker;
use crate::features::checking::ports::{Checker, OperationVisitor};
use crate::features::lock_protocol::{satisfies, LockAction, LockState};
use crate::features::package_desc::{PackageDesc, TypeCatalog};
use crate::features::syntax::{Decl, FuncDecl, GoFile, ObjectPath};
use crate::shared::models::{ObjectId, Span};

pub struct ContractChecker;

impl Checker for ContractChecker {
    fn name(&self) -> &'static str {
        "contracts"
    }

    fn check_file(
        &self,
        file: &GoFile,
        catalog: &TypeCatalog<'_>,
        cfg: &AnalyzerConfig,
    ) -> Vec<Report> {
        let desc = catalog.desc();
        let mut reports = Vec::new();
        for decl in &file.decls {
            let Decl::Func(func) = decl else { continue };
            let Some(body) = &func.body else { continue };
            if !cfg.wants_function(&func.name.name) {
                continue;
            }
            let mut ctx = CheckContext::for_function(file.path.clone(), func, desc);
            let mut visitor = ContractVisitor::bind(func, desc, &mut ctx);
            let mut walker = FlowWalker::new(&mut visitor, catalog);
            walker.walk_body(&mut ctx, body);
            reports.append(&mut ctx.reports);
        }
        reports
    }
}

/// An annotation on the function under check, resolved to an object.
struct BoundAnnotation {
    id: ObjectId,
    path: ObjectPath,
    kind: AnnotationKind,
    negated: bool,
}

/// One lock requirement protecting a guarded object.
struct GuardReq {
    lock_id: ObjectId,
    lock_text: String,
    required: LockState,
}

struct ContractVisitor<'a> {
    desc: &'a PackageDesc,
    func_name: String,
    recv_type: Option<String>,
    self_id: Option<ObjectId>,
    own: Vec<BoundAnnotation>,
    guards: FxHashMap<ObjectId, Vec<GuardReq>>,
}

impl<'a> ContractVisitor<'a> {
    /// Resolve the function's annotations and every guard that can
    /// apply inside it, creating their objects up front.
    fn bind(func: &FuncDecl, desc: &'a PackageDesc, ctx: &mut CheckContext) -> Self {
        let func_name = func.name.name.clone();
        let recv_name = func
            .receiver
            .as_ref()
            .and_then(|r| r.name.as_ref())
            .map(|i| i.name.clone());
        let recv_type = func.receiver.as_ref().map(|r| r.type_name.clone());
        let self_id = recv_name
            .as_deref()
            .and_then(|name| ctx.resolver.resolve_name(name));

        let declared: &[Annotation] = match &recv_type {
            Some(type_name) => desc
                .type_desc(type_name)
                .and_then(|t| t.method(&func_name))
                .map(|m| m.annotations.as_slice())
                .unwrap_or_default(),
            None => desc
                .function(&func_name)
                .map(|f| f.annotations.as_slice())
                .unwrap_or_default(),
        };

        let mut own = Vec::new();
        for ann in declared {
            match ctx.resolver.add_path(&ann.path) {
                Some(id) => own.push(BoundAnnotation {
                    id,
                    path: ann.path.clone(),
                    kind: ann.kind,
                    negated: ann.negated,
                }),
                None => warn!(
                    func = %func_name,
                    path = %ann.path,
                    "dropping annotation with unresolvable root"
                ),
            }
        }

        let mut guards: FxHashMap<ObjectId, Vec<GuardReq>> = FxHashMap::default();
        if let (Some(recv_name), Some(type_name)) = (&recv_name, &recv_type) {
            if let Some(type_desc) = desc.type_desc(type_name) {
                for (field_name, field) in &type_desc.fields {
                    if field.guards.is_empty() {
                        continue;
                    }
                    let field_path =
                        ObjectPath::from_segments(vec![recv_name.clone(), field_name.clone()]);
                    let Some(field_id) = ctx.resolver.add_path(&field_path) else {
                        continue;
                    };
                    for guard in &field.guards {
                        if let Some(req) = bind_guard(ctx, guard, Some(recv_name)) {
                            guards.entry(field_id).or_default().push(req);
                        }
                    }
                }
            }
        }
        for (var_name, var) in &desc.vars {
            if var.guards.is_empty() {
                continue;
            }
            let var_path = ObjectPath::from_segments(vec![var_name.clone()]);
            let Some(var_id) = ctx.resolver.add_path(&var_path) else {
                continue;
            };
            for guard in &var.guards {
                if let Some(req) = bind_guard(ctx, guard, recv_name.as_deref()) {
                    guards.entry(var_id).or_default().push(req);
                }
            }
        }

        Self {
            desc,
            func_name,
            recv_type,
            self_id,
            own,
            guards,
        }
    }

    /// Resolve a lock action target, creating the object under a known
    /// root. A bare unknown name is a finding; an unknown multi-segment
    /// prefix (a qualified import, state from another file) is bound on
    /// demand instead.
    fn bind_action_target(
        &self,
        ctx: &mut CheckContext,
        run: &PathRun,
        span: Span,
    ) -> Option<ObjectId> {
        if run.len() == 1 {
            ctx.report(CheckError::UnknownObject { name: run.text() }, span);
            return None;
        }
        match ctx.resolver.add_path(run.path()) {
            Some(id) => Some(id),
            None => {
                let root = run.root()?;
                ctx.resolver.declare(root);
                ctx.resolver.add_path(run.path())
            }
        }
    }

    /// Check one annotation of a callee at a call site.
    fn check_contract(
        &self,
        ctx: &mut CheckContext,
        ann: &Annotation,
        callee_recv: Option<&str>,
        caller_root: Option<&str>,
        callee_name: &str,
        span: Span,
    ) {
        // The callee writes its requirement against its own receiver
        // name; re-root it onto the caller's object.
        let rewritten = match (callee_recv, caller_root, ann.path.root()) {
            (Some(recv), Some(caller), Some(root)) if root == recv => ann.path.with_root(caller),
            _ => ann.path.clone(),
        };

        // The caller's own annotations settle the question statically.
        if !ann.negated {
            if let Some(own) = self
                .own
                .iter()
                .find(|o| !o.negated && o.path == rewritten)
            {
                if own.kind.covers(ann.kind) {
                    return;
                }
                ctx.report(
                    CheckError::InvalidState {
                        object: rewritten.text(),
                        expected: ann.required_state(),
                        actual: own.kind.required_state(),
                        reason: None,
                    },
                    span,
                );
                return;
            }
        }

        // Otherwise consult tracked state.
        let Some(id) = ctx.resolver.add_path(&rewritten) else {
            return;
        };
        let actual = ctx.states.state(id);
        let required = ann.required_state();
        if !satisfies(actual, required) {
            ctx.report(
                CheckError::InvalidState {
                    object: rewritten.text(),
                    expected: required,
                    actual,
                    reason: Some(format!("in call to {callee_name}")),
                },
                span,
            );
        }
        if ann.negated {
            // A negated annotation marks the function that performs the
            // acquire itself; the lock is held once it returns.
            let _ = ctx.apply_action(id, ann.kind.acquire_action());
        }
    }
}

fn bind_guard(
    ctx: &mut CheckContext,
    guard: &Annotation,
    recv_name: Option<&str>,
) -> Option<GuardReq> {
    // Guard lock paths are written either against the receiver name
    // ("t.mu") or as absolute package paths ("globalMu"); try the path
    // as written first, then under the receiver.
    let (lock_id, lock_text) = if let Some(id) = ctx.resolver.add_path(&guard.path) {
        (id, guard.path.text())
    } else if let Some(recv) = recv_name {
        let prefixed = guard.path.prefixed(recv);
        match ctx.resolver.add_path(&prefixed) {
            Some(id) => (id, prefixed.text()),
            None => {
                warn!(path = %guard.path, "dropping guard with unresolvable lock");
                return None;
            }
        }
    } else {
        warn!(path = %guard.path, "dropping guard with unresolvable lock");
        return None;
    };
    Some(GuardReq {
        lock_id,
        lock_text,
        required: guard.required_state(),
    })
}

impl OperationVisitor for ContractVisitor<'_> {
    fn on_access(&mut self, ctx: &mut CheckContext, run: &PathRun, span: Span) {
        let Some(id) = ctx.resolver.resolve_path(run.path()) else {
            return;
        };
        let Some(reqs) = self.guards.get(&id) else {
            return;
        };
        for req in reqs {
            let actual = ctx.states.state(req.lock_id);
            if !satisfies(actual, req.required) {
                ctx.report(
                    CheckError::InvalidState {
                        object: req.lock_text.clone(),
                        expected: req.required,
                        actual,
                        reason: Some(format!("access to \"{}\"", run.text())),
                    },
                    span,
                );
            }
        }
    }

    fn on_action(&mut self, ctx: &mut CheckContext, run: &PathRun, action: LockAction, span: Span) {
        let id = match ctx.resolver.resolve_path(run.path()) {
            Some(id) => id,
            None => match self.bind_action_target(ctx, run, span) {
                Some(id) => id,
                None => return,
            },
        };

        // Acquiring a lock the annotation says the caller already
        // holds.
        if action.is_acquire() && self.own.iter().any(|o| !o.negated && o.id == id) {
            ctx.report(
                CheckError::InvalidAction {
                    subject: self.func_name.clone(),
                    object: run.text(),
                    action,
                    reason: Some("annotation".to_string()),
                },
                span,
            );
        }

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

    fn on_call(&mut self, ctx: &mut CheckContext, run: &PathRun, name: &str, span: Span) {
        let desc = self.desc;

        if run.is_empty() {
            // Free function call; contracts apply as written.
            if let Some(func) = desc.function(name) {
                for ann in &func.annotations {
                    self.check_contract(ctx, ann, None, None, name, span);
                }
            }
            return;
        }

        // Only calls through the bare receiver are method calls we can
        // attribute within the package.
        if run.len() != 1 {
            return;
        }
        let Some(recv_id) = ctx.resolver.resolve_path(run.path()) else {
            return;
        };
        if self.self_id != Some(recv_id) {
            return;
        }
        let Some(recv_type) = self.recv_type.clone() else {
            return;
        };

        match desc.type_desc(&recv_type).and_then(|t| t.method(name)) {
            None => ctx.report(
                CheckError::UnknownMethod {
                    name: name.to_string(),
                },
                span,
            ),
            Some(method) => {
                let caller_root = run.root().map(str::to_string);
                for ann in &method.annotations {
                    self.check_contract(
                        ctx,
                        ann,
                        method.recv_name.as_deref(),
                        caller_root.as_deref(),
                        name,
                        span,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::package_desc::describe;
    use crate::features::parsing::parse_go_source;
    use std::path::PathBuf;

    fn check(source: &str) -> Vec<String> {
        let file = parse_go_source(source, PathBuf::from("contract_test.go")).unwrap();
        let cfg = AnalyzerConfig::default();
        let desc = describe(std::slice::from_ref(&file), &cfg.annotation_tag);
        let catalog = TypeCatalog::new(&desc, &cfg.lock_types);
        let mut reports = ContractChecker.check_file(&file, &catalog, &cfg);
        reports.sort_by_key(|r| r.span.start.offset);
        reports.iter().map(|r| r.error.to_string()).collect()
    }

    const HEADER: &str = r#"package fixtures

type T struct {
	m    sync.RWMutex
	mut  sync.Mutex
	flag bool
	// locklint:t.m.Lock
	data map[string]int
}
"#;

    fn with_header(body: &str) -> String {
        format!("{HEADER}\n{body}")
    }

    #[test]
    fn test_acquiring_an_annotated_lock_is_reported() {
        let reports = check(&with_header(
            r#"
// locklint:t.m.RLock, t.mut.Lock
func (t *T) func3() {
	t.m.Lock()
}
"#,
        ));
        assert_eq!(reports, vec![r#"func3 cannot "lock" t.m [annotation]"#]);
    }

    #[test]
    fn test_calling_annotated_method_without_locks() {
        let reports = check(&with_header(
            r#"
// locklint:t.m.RLock, t.mut.Lock
func (t *T) func3() {
	_ = t.flag
}

func (t *T) func3_1() {
	t.func3()
}
"#,
        ));
        assert_eq!(
            reports,
            vec![
                r#"in call to func3: mutex "t.m" should be rlocked, but now is unlocked"#,
                r#"in call to func3: mutex "t.mut" should be locked, but now is unlocked"#,
            ]
        );
    }

    #[test]
    fn test_dynamic_state_satisfies_contract() {
        let reports = check(&with_header(
            r#"
// locklint:t.m.RLock
func (t *T) reader() {
	_ = t.flag
}

func (t *T) caller() {
	t.m.RLock()
	t.reader()
	t.m.RUnlock()
}
"#,
        ));
        assert!(reports.is_empty(), "{reports:?}");
    }

    #[test]
    fn test_write_lock_satisfies_read_requirement() {
        let reports = check(&with_header(
            r#"
// locklint:t.m.RLock
func (t *T) reader() {
	_ = t.flag
}

func (t *T) caller() {
	t.m.Lock()
	t.reader()
	t.m.Unlock()
}
"#,
        ));
        assert!(reports.is_empty(), "{reports:?}");
    }

    #[test]
    fn test_rlocked_caller_of_write_locked_callee() {
        let reports = check(&with_header(
            r#"
// locklint:t.m.Lock
func (t *T) func3_2() {
	_ = t.flag
}

func (t *T) func3_3() {
	t.m.RLock()
	t.func3_2()
	t.m.RUnlock()
}
"#,
        ));
        assert_eq!(
            reports,
            vec![r#"in call to func3_2: mutex "t.m" should be locked, but now is rlocked"#]
        );
    }

    #[test]
    fn test_annotation_against_annotation_is_static() {
        let reports = check(&with_header(
            r#"
// locklint:t.m.Lock
func (t *T) func3_2() {
	_ = t.flag
}

// locklint:t.m.RLock
func (t *T) func3_4() {
	t.func3_2()
}
"#,
        ));
        assert_eq!(
            reports,
            vec![r#"mutex "t.m" should be locked, but now is rlocked"#]
        );
    }

    #[test]
    fn test_unlock_without_lock() {
        let reports = check(&with_header(
            r#"
func (t *T) func3_5() {
	t.m.Unlock()
	t.mut.Unlock()
}
"#,
        ));
        assert_eq!(
            reports,
            vec![
                r#"cannot "unlock" t.m [not locked]"#,
                r#"cannot "unlock" t.mut [not locked]"#,
            ]
        );
    }

    #[test]
    fn test_extra_unlock_after_balanced_pair() {
        let reports = check(&with_header(
            r#"
func (t *T) func3_6() {
	t.mut.Lock()
	t.mut.Unlock()
	t.mut.Unlock()
}
"#,
        ));
        assert_eq!(reports, vec![r#"cannot "unlock" t.mut [not locked]"#]);
    }

    #[test]
    fn test_guarded_field_needs_lock() {
        let reports = check(&with_header(
            r#"
func (t *T) readsLocked() {
	t.m.Lock()
	v := t.data["k"]
	t.m.Unlock()
	_ = v
}

func (t *T) readsUnlocked() {
	v := t.data["k"]
	_ = v
}
"#,
        ));
        assert_eq!(
            reports,
            vec![r#"access to "t.data": mutex "t.m" should be locked, but now is unlocked"#]
        );
    }

    #[test]
    fn test_defer_unlock_covers_every_exit() {
        let reports = check(&with_header(
            r#"
func (t *T) withDefer() {
	t.mut.Lock()
	defer t.mut.Unlock()
	if t.flag {
		return
	}
	_ = t.flag
}
"#,
        ));
        assert!(reports.is_empty(), "{reports:?}");
    }

    #[test]
    fn test_unknown_method_and_object() {
        let reports = check(&with_header(
            r#"
func (t *T) callsMissing() {
	t.frobnicate()
}

func free() {
	mu.Lock()
}
"#,
        ));
        assert_eq!(
            reports,
            vec![r#"unknown method "frobnicate""#, "unknown object: mu"]
        );
    }

    #[test]
    fn test_free_function_contract() {
        let reports = check(
            r#"package fixtures

var globalMu sync.Mutex

// locklint:globalMu.Lock
func mustHold() {}

func bad() {
	mustHold()
}

func good() {
	globalMu.Lock()
	mustHold()
	globalMu.Unlock()
}
"#,
        );
        assert_eq!(
            reports,
            vec![r#"in call to mustHold: mutex "globalMu" should be locked, but now is unlocked"#]
        );
    }

    #[test]
    fn test_negated_annotation_requires_unlocked() {
        let reports = check(&with_header(
            r#"
// locklint:!t.mut.Lock
func (t *T) wantsFree() {
	_ = t.flag
}

func (t *T) caller() {
	t.mut.Lock()
	t.wantsFree()
	t.mut.Unlock()
}
"#,
        ));
        assert_eq!(
            reports,
            vec![r#"in call to wantsFree: mutex "t.mut" should be unlocked, but now is locked"#]
        );
    }

    #[test]
    fn test_negated_callee_leaves_lock_held() {
        let reports = check(&with_header(
            r#"
// locklint:t.mut.Lock
func (t *T) step() {
	_ = t.flag
}

// locklint:!t.mut.Lock
func (t *T) acquire() {
	t.mut.Lock()
}

func (t *T) caller() {
	t.acquire()
	t.step()
	t.mut.Unlock()
}
"#,
        ));
        assert!(reports.is_empty(), "{reports:?}");
    }

    #[test]
    fn test_qualified_root_is_bound_on_demand() {
        let reports = check(&with_header(
            r#"
func (t *T) imported() {
	pkg.Mu.Lock()
	pkg.Mu.Lock()
	pkg.Mu.Unlock()
}
"#,
        ));
        assert_eq!(reports, vec![r#"cannot "lock" pkg.Mu [already locked]"#]);
    }

    #[test]
    fn test_branch_merge_keeps_uncertainty() {
        let reports = check(&with_header(
            r#"
func (t *T) oneSided() {
	if t.flag {
		t.m.Lock()
	}
	t.m.RUnlock()
}
"#,
        ));
        assert_eq!(reports, vec![r#"cannot "runlock" t.m [?locked]"#]);
    }
}
