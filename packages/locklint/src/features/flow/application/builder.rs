//! Flow construction
//!
//! Straightens a statement block into a [`Flow`]. An `if` chain closes
//! the current node and becomes its fork: the then-arm flow starts with
//! the arm's own init statement and condition expression (both have
//! observable reads), the else arm is the `else` block, a chained
//! `else if` nested one level deeper, or an empty flow when the source
//! has no `else` at all. The empty arm is what makes a one-sided lock
//! visible as a maybe-state after the merge.

use crate::features::flow::domain::{Flow, FlowNode};
use crate::features::syntax::domain::{ExprStmt, IfStmt, Stmt};

/// Build the flow of one statement block
pub fn build_flow(stmts: &[Stmt]) -> Flow {
    let mut nodes = Vec::new();
    let mut current = FlowNode::new();

    for stmt in stmts {
        match stmt {
            Stmt::If(if_stmt) => {
                current.branches = if_branches(if_stmt);
                nodes.push(std::mem::take(&mut current));
            }
            Stmt::Defer(defer) => {
                current.defers.push(Stmt::Expr(ExprStmt {
                    expr: defer.call.clone(),
                    span: defer.span,
                }));
            }
            other => current.statements.push(other.clone()),
        }
    }

    nodes.push(current);
    Flow { nodes }
}

fn if_branches(if_stmt: &IfStmt) -> Vec<Flow> {
    let mut then_stmts: Vec<Stmt> = Vec::new();
    if let Some(init) = &if_stmt.init {
        then_stmts.push((**init).clone());
    }
    then_stmts.push(Stmt::Expr(ExprStmt {
        expr: if_stmt.cond.clone(),
        span: if_stmt.cond.span(),
    }));
    then_stmts.extend(if_stmt.then.stmts.iter().cloned());

    let else_flow = match &if_stmt.else_arm {
        None => Flow::empty(),
        Some(arm) => match arm.as_ref() {
            Stmt::Block(block) => build_flow(&block.stmts),
            nested => build_flow(std::slice::from_ref(nested)),
        },
    };

    vec![build_flow(&then_stmts), else_flow]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::syntax::domain::{
        BasicLit, Block, DeferStmt, Expr, Ident, ReturnStmt,
    };
    use crate::shared::models::Span;

    fn expr_stmt(name: &str) -> Stmt {
        Stmt::Expr(ExprStmt {
            expr: Expr::Ident(Ident::new(name, Span::zero())),
            span: Span::zero(),
        })
    }

    fn cond() -> Expr {
        Expr::Basic(BasicLit {
            value: "true".to_string(),
            span: Span::zero(),
        })
    }

    fn block(stmts: Vec<Stmt>) -> Block {
        Block {
            stmts,
            span: Span::zero(),
        }
    }

    fn if_stmt(then: Vec<Stmt>, else_arm: Option<Stmt>) -> Stmt {
        Stmt::If(IfStmt {
            init: None,
            cond: cond(),
            then: block(then),
            else_arm: else_arm.map(Box::new),
            span: Span::zero(),
        })
    }

    #[test]
    fn test_straight_line_is_one_node() {
        let flow = build_flow(&[expr_stmt("a"), expr_stmt("b")]);
        assert_eq!(flow.nodes.len(), 1);
        assert_eq!(flow.nodes[0].statements.len(), 2);
        assert!(!flow.nodes[0].is_fork());
    }

    #[test]
    fn test_if_without_else_gets_empty_arm() {
        let flow = build_flow(&[if_stmt(vec![expr_stmt("a")], None)]);
        assert_eq!(flow.nodes.len(), 2);
        let fork = &flow.nodes[0];
        assert_eq!(fork.branches.len(), 2);
        // then-arm = condition + body
        assert_eq!(fork.branches[0].nodes[0].statements.len(), 2);
        assert!(fork.branches[1].is_empty());
    }

    #[test]
    fn test_else_block_becomes_second_arm() {
        let else_arm = Stmt::Block(block(vec![expr_stmt("b")]));
        let flow = build_flow(&[if_stmt(vec![expr_stmt("a")], Some(else_arm))]);
        let fork = &flow.nodes[0];
        assert_eq!(fork.branches.len(), 2);
        assert_eq!(fork.branches[1].nodes[0].statements.len(), 1);
    }

    #[test]
    fn test_else_if_nests_a_fork() {
        let chained = if_stmt(vec![expr_stmt("b")], None);
        let flow = build_flow(&[if_stmt(vec![expr_stmt("a")], Some(chained))]);
        let else_arm = &flow.nodes[0].branches[1];
        assert!(else_arm.nodes[0].is_fork());
        assert_eq!(else_arm.nodes[0].branches.len(), 2);
    }

    #[test]
    fn test_statements_after_fork_open_new_node() {
        let flow = build_flow(&[if_stmt(vec![], None), expr_stmt("after")]);
        assert_eq!(flow.nodes.len(), 2);
        assert_eq!(flow.nodes[1].statements.len(), 1);
    }

    #[test]
    fn test_defer_moves_out_of_statements() {
        let defer = Stmt::Defer(DeferStmt {
            call: Expr::Ident(Ident::new("f", Span::zero())),
            span: Span::zero(),
        });
        let flow = build_flow(&[defer, expr_stmt("a")]);
        assert_eq!(flow.nodes[0].defers.len(), 1);
        assert_eq!(flow.nodes[0].statements.len(), 1);
    }

    #[test]
    fn test_return_stays_in_statements() {
        let ret = Stmt::Return(ReturnStmt {
            values: vec![],
            span: Span::zero(),
        });
        let flow = build_flow(&[ret]);
        assert_eq!(flow.nodes[0].statements.len(), 1);
    }
}
