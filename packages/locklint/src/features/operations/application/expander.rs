//! Statement and expression expansion
//!
//! Turns syntax into operation chains. One statement yields one chain
//! per independent top-level expression, which is what keeps receiver
//! paths from bleeding across unrelated expressions: both operands of a
//! comparison become separate chains, while a selector chain stays one
//! chain with its reads in order.
//!
//! Assignments emit their right-hand chains first and a write chain per
//! target afterwards, matching evaluation order. Function literals that
//! are not called where they appear are handed back separately; the
//! checker explores those bodies in a fresh context.

use crate::features::operations::domain::{
    DerefOp, ExecOp, IndexOp, NewOp, Operation, OperationChain, ReadOp, WriteOp,
};
use crate::features::syntax::domain::{AssignStmt, Block, CallExpr, Expr, Stmt};

/// Expansion result for one statement
#[derive(Debug, Clone, Default)]
pub struct ExpandedStmt {
    pub chains: Vec<OperationChain>,
    /// Bodies of function literals that were not called where they
    /// appeared
    pub funclit_bodies: Vec<Block>,
}

/// Expand one simple statement. Control statements (if, for, switch,
/// go, defer, ...) yield nothing here; the walker decomposes them.
pub fn expand_stmt(stmt: &Stmt) -> ExpandedStmt {
    let mut expander = Expander::default();
    let mut chains = Vec::new();

    match stmt {
        Stmt::Expr(s) => expander.collect(&s.expr, &mut chains),
        Stmt::Assign(s) => expander.assignment(s, &mut chains),
        Stmt::IncDec(s) => {
            let lhs = expander.path_ops(&s.expr);
            if !lhs.is_empty() {
                chains.push(OperationChain::from_ops(vec![Operation::Write(WriteOp {
                    lhs: OperationChain::from_ops(lhs),
                    rhs: OperationChain::new(),
                    span: s.span,
                })]));
            }
        }
        Stmt::Var(s) => {
            for value in &s.values {
                expander.collect(value, &mut chains);
            }
        }
        Stmt::Return(s) => {
            for value in &s.values {
                expander.collect(value, &mut chains);
            }
        }
        _ => {}
    }

    ExpandedStmt {
        chains,
        funclit_bodies: expander.funclits,
    }
}

/// Expand one expression (conditions, switch tags, go/defer calls)
pub fn expand_expr(expr: &Expr) -> ExpandedStmt {
    let mut expander = Expander::default();
    let mut chains = Vec::new();
    expander.collect(expr, &mut chains);
    ExpandedStmt {
        chains,
        funclit_bodies: expander.funclits,
    }
}

#[derive(Default)]
struct Expander {
    funclits: Vec<Block>,
}

impl Expander {
    /// Collect the chains of an expression in operand position. Binary
    /// operands split into separate chains; path-shaped expressions
    /// become a single chain.
    fn collect(&mut self, expr: &Expr, out: &mut Vec<OperationChain>) {
        match expr {
            Expr::Binary(bin) => {
                self.collect(&bin.x, out);
                self.collect(&bin.y, out);
            }
            Expr::Basic(_) => {}
            Expr::FuncLit(lit) => self.funclits.push(lit.body.clone()),
            _ => {
                let ops = self.path_ops(expr);
                if !ops.is_empty() {
                    out.push(OperationChain::from_ops(ops));
                }
            }
        }
    }

    /// Operations of a path-shaped expression, in evaluation order
    fn path_ops(&mut self, expr: &Expr) -> Vec<Operation> {
        match expr {
            Expr::Ident(id) => vec![Operation::Read(ReadOp {
                name: id.name.clone(),
                span: id.span,
            })],
            Expr::Selector(sel) => {
                let mut ops = self.path_ops(&sel.x);
                ops.push(Operation::Read(ReadOp {
                    name: sel.sel.name.clone(),
                    span: sel.sel.span,
                }));
                ops
            }
            Expr::Call(call) => self.call_ops(call),
            Expr::Index(ix) => {
                let x = OperationChain::from_ops(self.path_ops(&ix.x));
                let index = OperationChain::from_ops(self.path_ops(&ix.index));
                vec![Operation::Index(IndexOp {
                    x,
                    index,
                    index_text: ix.index.text(),
                    span: ix.span,
                })]
            }
            Expr::Star(st) => vec![Operation::Deref(DerefOp {
                x: OperationChain::from_ops(self.path_ops(&st.x)),
                span: st.span,
            })],
            Expr::Unary(un) => self.path_ops(&un.x),
            Expr::Binary(bin) => {
                // path position forced on a binary (rare); keep both
                // sides in order
                let mut ops = self.path_ops(&bin.x);
                ops.extend(self.path_ops(&bin.y));
                ops
            }
            Expr::Composite(lit) => {
                let mut inits = Vec::new();
                for element in &lit.elements {
                    self.collect(element, &mut inits);
                }
                vec![Operation::New(NewOp {
                    type_text: lit.type_text.clone().unwrap_or_default(),
                    inits,
                    span: lit.span,
                })]
            }
            Expr::FuncLit(lit) => {
                self.funclits.push(lit.body.clone());
                vec![]
            }
            Expr::Basic(_) | Expr::Other(_) => vec![],
        }
    }

    fn call_ops(&mut self, call: &CallExpr) -> Vec<Operation> {
        let mut args = Vec::new();
        for arg in &call.args {
            self.collect(arg, &mut args);
        }

        match call.func.as_ref() {
            Expr::Selector(sel) => {
                let mut ops = self.path_ops(&sel.x);
                ops.push(Operation::Exec(ExecOp {
                    name: sel.sel.name.clone(),
                    args,
                    body: None,
                    span: sel.sel.span,
                }));
                ops
            }
            Expr::Ident(id) => vec![Operation::Exec(ExecOp {
                name: id.name.clone(),
                args,
                body: None,
                span: id.span,
            })],
            Expr::FuncLit(lit) => vec![Operation::Exec(ExecOp {
                name: String::new(),
                args,
                body: Some(lit.body.clone()),
                span: call.span,
            })],
            other => {
                // call through a call or index result: `fs[i]()`
                let mut ops = self.path_ops(other);
                ops.push(Operation::Exec(ExecOp {
                    name: String::new(),
                    args,
                    body: None,
                    span: call.span,
                }));
                ops
            }
        }
    }

    /// RHS chains first, then one write chain per target
    fn assignment(&mut self, assign: &AssignStmt, out: &mut Vec<OperationChain>) {
        let mut rhs_per_target: Vec<OperationChain> = Vec::new();
        for rhs in &assign.rhs {
            let mut chains = Vec::new();
            self.collect(rhs, &mut chains);
            let mut combined = OperationChain::new();
            for chain in &chains {
                combined.ops.extend(chain.ops.iter().cloned());
            }
            out.extend(chains);
            rhs_per_target.push(combined);
        }

        for (i, lhs) in assign.lhs.iter().enumerate() {
            let lhs_ops = self.path_ops(lhs);
            if lhs_ops.is_empty() {
                continue;
            }
            let rhs = rhs_per_target.get(i).cloned().unwrap_or_default();
            out.push(OperationChain::from_ops(vec![Operation::Write(WriteOp {
                lhs: OperationChain::from_ops(lhs_ops),
                rhs,
                span: assign.span,
            })]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::syntax::domain::{
        BasicLit, BinaryExpr, CompositeLit, ExprStmt, Ident, IncDecStmt, IndexExpr, SelectorExpr,
    };
    use crate::shared::models::Span;

    fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new(name, Span::zero()))
    }

    fn selector(x: Expr, sel: &str) -> Expr {
        Expr::Selector(SelectorExpr {
            x: Box::new(x),
            sel: Ident::new(sel, Span::zero()),
            span: Span::zero(),
        })
    }

    fn call(func: Expr, args: Vec<Expr>) -> Expr {
        Expr::Call(CallExpr {
            func: Box::new(func),
            args,
            span: Span::zero(),
        })
    }

    fn chain_strings(expanded: &ExpandedStmt) -> Vec<String> {
        expanded.chains.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_method_call_chain() {
        let expr = call(selector(selector(ident("t"), "mu"), "Lock"), vec![]);
        let expanded = expand_expr(&expr);
        assert_eq!(chain_strings(&expanded), vec!["[r:t r:mu e:Lock]"]);
    }

    #[test]
    fn test_args_nest_inside_exec() {
        let expr = call(ident("f"), vec![selector(ident("t"), "x")]);
        let expanded = expand_expr(&expr);
        assert_eq!(chain_strings(&expanded), vec!["[e:f([r:t r:x])]"]);
    }

    #[test]
    fn test_binary_operands_split_into_chains() {
        let expr = Expr::Binary(BinaryExpr {
            x: Box::new(selector(ident("t"), "a")),
            op: "==".to_string(),
            y: Box::new(selector(ident("t"), "b")),
            span: Span::zero(),
        });
        let expanded = expand_expr(&expr);
        assert_eq!(chain_strings(&expanded), vec!["[r:t r:a]", "[r:t r:b]"]);
    }

    #[test]
    fn test_literals_expand_to_nothing() {
        let expr = Expr::Basic(BasicLit {
            value: "42".to_string(),
            span: Span::zero(),
        });
        assert!(expand_expr(&expr).chains.is_empty());
    }

    #[test]
    fn test_assignment_rhs_before_write() {
        let stmt = Stmt::Assign(AssignStmt {
            lhs: vec![selector(ident("t"), "mu")],
            rhs: vec![ident("x")],
            define: false,
            span: Span::zero(),
        });
        let expanded = expand_stmt(&stmt);
        assert_eq!(
            chain_strings(&expanded),
            vec!["[r:x]", "[w:[r:t r:mu]=[r:x]]"]
        );
    }

    #[test]
    fn test_multi_assignment_pairs_targets() {
        let stmt = Stmt::Assign(AssignStmt {
            lhs: vec![ident("a"), ident("b")],
            rhs: vec![ident("x"), ident("y")],
            define: false,
            span: Span::zero(),
        });
        let expanded = expand_stmt(&stmt);
        assert_eq!(
            chain_strings(&expanded),
            vec![
                "[r:x]",
                "[r:y]",
                "[w:[r:a]=[r:x]]",
                "[w:[r:b]=[r:y]]"
            ]
        );
    }

    #[test]
    fn test_incdec_is_a_write() {
        let stmt = Stmt::IncDec(IncDecStmt {
            expr: selector(ident("t"), "count"),
            span: Span::zero(),
        });
        let expanded = expand_stmt(&stmt);
        assert_eq!(chain_strings(&expanded), vec!["[w:[r:t r:count]=[]]"]);
    }

    #[test]
    fn test_index_keeps_source_text() {
        let expr = call(
            selector(
                Expr::Index(IndexExpr {
                    x: Box::new(selector(ident("t"), "locks")),
                    index: Box::new(ident("key")),
                    span: Span::zero(),
                }),
                "Lock",
            ),
            vec![],
        );
        let expanded = expand_expr(&expr);
        assert_eq!(
            chain_strings(&expanded),
            vec!["[i:[r:t r:locks][key] e:Lock]"]
        );
    }

    #[test]
    fn test_composite_literal_is_new() {
        let expr = Expr::Composite(CompositeLit {
            type_text: Some("Tracker".to_string()),
            elements: vec![ident("x")],
            span: Span::zero(),
        });
        let expanded = expand_expr(&expr);
        assert_eq!(chain_strings(&expanded), vec!["[n:Tracker]"]);
    }

    #[test]
    fn test_uncalled_funclit_body_is_surfaced() {
        let lit = Expr::FuncLit(crate::features::syntax::domain::FuncLit {
            body: Block {
                stmts: vec![],
                span: Span::zero(),
            },
            span: Span::zero(),
        });
        let stmt = Stmt::Assign(AssignStmt {
            lhs: vec![ident("f")],
            rhs: vec![lit],
            define: true,
            span: Span::zero(),
        });
        let expanded = expand_stmt(&stmt);
        assert_eq!(expanded.funclit_bodies.len(), 1);
    }

    #[test]
    fn test_called_funclit_stays_inline() {
        let lit = Expr::FuncLit(crate::features::syntax::domain::FuncLit {
            body: Block {
                stmts: vec![],
                span: Span::zero(),
            },
            span: Span::zero(),
        });
        let stmt = Stmt::Expr(ExprStmt {
            expr: call(lit, vec![]),
            span: Span::zero(),
        });
        let expanded = expand_stmt(&stmt);
        assert!(expanded.funclit_bodies.is_empty());
        assert_eq!(chain_strings(&expanded), vec!["[e:func()]"]);
    }
}
