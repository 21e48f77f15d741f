//! CST lowering
//!
//! Converts a tree-sitter Go parse tree into the crate's own syntax
//! tree. The lowering is lossy on purpose: only the constructs the
//! checkers interpret keep structure, the rest collapses to
//! `Stmt::Other` / `Expr::Other`. Type expressions are never modeled,
//! only their source text is carried along.
//!
//! Doc comments are attached here: a run of comment lines immediately
//! above a declaration (or struct field, or var spec) becomes its doc,
//! and a trailing comment on the same line as a field is appended to
//! that field's doc.

use std::path::PathBuf;

use tree_sitter::Node;

use crate::features::syntax::domain::ast::{
    AssignStmt, BasicLit, BinaryExpr, Block, CallExpr, CaseClause, CommClause, CompositeLit, Decl,
    DeferStmt, Expr, ExprStmt, Field, ForStmt, FuncDecl, FuncLit, GoFile, GoStmt, Ident, IfStmt,
    IncDecStmt, IndexExpr, Param, RangeStmt, Receiver, ReturnStmt, SelectStmt, SelectorExpr, Stmt,
    StarExpr, SwitchStmt, TypeDecl, UnaryExpr, VarDecl, VarStmt,
};
use crate::shared::models::{Location, Span};

pub fn lower_file(root: Node, source: &str, path: PathBuf) -> GoFile {
    let lowering = Lowering { source };
    lowering.file(root, path)
}

struct Lowering<'s> {
    source: &'s str,
}

/// Comment run accumulator for doc attachment
#[derive(Default)]
struct DocBuffer {
    lines: Vec<String>,
    last_row: Option<usize>,
}

impl DocBuffer {
    fn push(&mut self, node: Node, source: &str) {
        let start_row = node.start_position().row;
        // A blank line breaks the run.
        if self.last_row.is_some_and(|row| start_row > row + 1) {
            self.lines.clear();
        }
        self.lines.extend(comment_lines(node_text(node, source)));
        self.last_row = Some(node.end_position().row);
    }

    /// Take the accumulated run if it ends directly above (or on) the
    /// given row, otherwise discard it.
    fn take_for(&mut self, row: usize) -> Vec<String> {
        let adjacent = self.last_row.is_some_and(|last| row <= last + 1);
        let lines = std::mem::take(&mut self.lines);
        self.last_row = None;
        if adjacent {
            lines
        } else {
            Vec::new()
        }
    }

    fn reset(&mut self) {
        self.lines.clear();
        self.last_row = None;
    }
}

fn comment_lines(text: &str) -> Vec<String> {
    if let Some(rest) = text.strip_prefix("//") {
        return vec![rest.trim().to_string()];
    }
    let inner = text
        .trim_start_matches("/*")
        .trim_end_matches("*/");
    inner
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn node_text<'s>(node: Node, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// Named children of a var/const declaration. The grammar nests the
/// specs (and interior comments) of a grouped `var (...)` one level
/// down in a `var_spec_list`; flatten that wrapper away so grouped and
/// ungrouped declarations read the same.
fn spec_nodes(node: Node) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "var_spec_list" {
            let mut inner = child.walk();
            nodes.extend(child.named_children(&mut inner));
        } else {
            nodes.push(child);
        }
    }
    nodes
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node) -> String {
        node_text(node, self.source).to_string()
    }

    fn span(&self, node: Node) -> Span {
        let start = node.start_position();
        let end = node.end_position();
        Span::new(
            Location {
                line: start.row as u32 + 1,
                column: start.column as u32,
                offset: node.start_byte() as u32,
            },
            Location {
                line: end.row as u32 + 1,
                column: end.column as u32,
                offset: node.end_byte() as u32,
            },
        )
    }

    fn ident(&self, node: Node) -> Ident {
        Ident::new(self.text(node), self.span(node))
    }

    // ── file level ─────────────────────────────────────────────────

    fn file(&self, root: Node, path: PathBuf) -> GoFile {
        let mut package = String::new();
        let mut decls = Vec::new();
        let mut doc = DocBuffer::default();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "comment" => doc.push(child, self.source),
                "package_clause" => {
                    if let Some(name) = child.named_child(0) {
                        package = self.text(name);
                    }
                    doc.reset();
                }
                "function_declaration" | "method_declaration" => {
                    let lines = doc.take_for(child.start_position().row);
                    decls.push(Decl::Func(self.func_decl(child, lines)));
                }
                "type_declaration" => {
                    let lines = doc.take_for(child.start_position().row);
                    self.type_decls(child, lines, &mut decls);
                }
                "var_declaration" | "const_declaration" => {
                    let lines = doc.take_for(child.start_position().row);
                    self.var_decls(child, lines, &mut decls);
                }
                _ => doc.reset(),
            }
        }

        GoFile {
            path,
            package,
            decls,
        }
    }

    fn func_decl(&self, node: Node, doc: Vec<String>) -> FuncDecl {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.ident(n))
            .unwrap_or_else(|| Ident::new("", self.span(node)));

        let receiver = node
            .child_by_field_name("receiver")
            .and_then(|list| self.receiver(list));

        let params = node
            .child_by_field_name("parameters")
            .map(|list| self.params(list))
            .unwrap_or_default();

        let results = node
            .child_by_field_name("result")
            .map(|result| self.results(result))
            .unwrap_or_default();

        let body = node.child_by_field_name("body").map(|b| self.block(b));

        FuncDecl {
            name,
            receiver,
            params,
            results,
            body,
            doc,
            span: self.span(node),
        }
    }

    fn receiver(&self, list: Node) -> Option<Receiver> {
        let mut cursor = list.walk();
        let decl = list
            .named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_declaration")?;
        let name = decl.child_by_field_name("name").map(|n| self.ident(n));
        let type_name = decl
            .child_by_field_name("type")
            .map(|t| self.text(t))
            .unwrap_or_default()
            .trim_start_matches('*')
            .trim()
            .to_string();
        Some(Receiver {
            name,
            type_name,
            span: self.span(decl),
        })
    }

    fn params(&self, list: Node) -> Vec<Param> {
        let mut params = Vec::new();
        let mut cursor = list.walk();
        for decl in list.named_children(&mut cursor) {
            match decl.kind() {
                "parameter_declaration" | "variadic_parameter_declaration" => {
                    let mut names = Vec::new();
                    let mut name_cursor = decl.walk();
                    for name in decl.children_by_field_name("name", &mut name_cursor) {
                        names.push(self.ident(name));
                    }
                    let type_text = decl
                        .child_by_field_name("type")
                        .map(|t| self.text(t))
                        .unwrap_or_default();
                    params.push(Param {
                        names,
                        type_text,
                        span: self.span(decl),
                    });
                }
                _ => {}
            }
        }
        params
    }

    /// The `result` field is either a parenthesized parameter list or a
    /// single bare type.
    fn results(&self, result: Node) -> Vec<Param> {
        if result.kind() == "parameter_list" {
            self.params(result)
        } else {
            vec![Param {
                names: Vec::new(),
                type_text: self.text(result),
                span: self.span(result),
            }]
        }
    }

    fn type_decls(&self, node: Node, doc: Vec<String>, decls: &mut Vec<Decl>) {
        let mut cursor = node.walk();
        for spec in node.named_children(&mut cursor) {
            if spec.kind() != "type_spec" {
                continue;
            }
            let name = spec
                .child_by_field_name("name")
                .map(|n| self.ident(n))
                .unwrap_or_else(|| Ident::new("", self.span(spec)));
            let type_node = spec.child_by_field_name("type");
            let is_struct = type_node.is_some_and(|t| t.kind() == "struct_type");
            let fields = type_node
                .filter(|t| t.kind() == "struct_type")
                .map(|t| self.struct_fields(t))
                .unwrap_or_default();
            decls.push(Decl::Type(TypeDecl {
                name,
                fields,
                is_struct,
                doc: doc.clone(),
                span: self.span(spec),
            }));
        }
    }

    fn struct_fields(&self, struct_type: Node) -> Vec<Field> {
        let Some(list) = struct_type
            .named_children(&mut struct_type.walk())
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };

        let mut fields: Vec<Field> = Vec::new();
        let mut doc = DocBuffer::default();
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    let row = child.start_position().row;
                    // Trailing comment on the same line annotates the
                    // field it follows.
                    if let Some(last) = fields
                        .last_mut()
                        .filter(|f| f.span.start.line as usize == row + 1)
                    {
                        last.doc.extend(comment_lines(node_text(child, self.source)));
                    } else {
                        doc.push(child, self.source);
                    }
                }
                "field_declaration" => {
                    let lines = doc.take_for(child.start_position().row);
                    let mut names = Vec::new();
                    let mut name_cursor = child.walk();
                    for name in child.children_by_field_name("name", &mut name_cursor) {
                        names.push(self.ident(name));
                    }
                    let type_text = child
                        .child_by_field_name("type")
                        .map(|t| self.text(t))
                        .unwrap_or_else(|| self.text(child));
                    fields.push(Field {
                        names,
                        type_text,
                        doc: lines,
                        span: self.span(child),
                    });
                }
                _ => doc.reset(),
            }
        }
        fields
    }

    fn var_decls(&self, node: Node, outer_doc: Vec<String>, decls: &mut Vec<Decl>) {
        let mut doc = DocBuffer::default();
        let mut first = true;
        for spec in spec_nodes(node) {
            match spec.kind() {
                "comment" => doc.push(spec, self.source),
                "var_spec" | "const_spec" => {
                    let mut lines = doc.take_for(spec.start_position().row);
                    if lines.is_empty() && first {
                        lines = outer_doc.clone();
                    }
                    first = false;
                    decls.push(Decl::Var(self.var_spec(spec, lines)));
                }
                _ => doc.reset(),
            }
        }
    }

    fn var_spec(&self, spec: Node, doc: Vec<String>) -> VarDecl {
        let mut names = Vec::new();
        let mut cursor = spec.walk();
        for name in spec.children_by_field_name("name", &mut cursor) {
            names.push(self.ident(name));
        }
        let type_text = spec.child_by_field_name("type").map(|t| self.text(t));
        let values = self.expr_list(spec.child_by_field_name("value"));
        VarDecl {
            names,
            type_text,
            values,
            doc,
            span: self.span(spec),
        }
    }

    // ── statements ─────────────────────────────────────────────────

    fn block(&self, node: Node) -> Block {
        let mut stmts = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.stmt_into(child, &mut stmts);
        }
        Block {
            stmts,
            span: self.span(node),
        }
    }

    fn stmt(&self, node: Node) -> Stmt {
        let mut out = Vec::with_capacity(1);
        self.stmt_into(node, &mut out);
        out.into_iter()
            .next()
            .unwrap_or(Stmt::Other(self.span(node)))
    }

    /// Lower one statement node, appending zero or more statements: a
    /// grouped `var (...)` splices one statement per spec, comments and
    /// empty statements vanish.
    fn stmt_into(&self, node: Node, out: &mut Vec<Stmt>) {
        let span = self.span(node);
        match node.kind() {
            "comment" | "empty_statement" => {}
            "expression_statement" => {
                if let Some(expr) = node.named_child(0) {
                    out.push(Stmt::Expr(ExprStmt {
                        expr: self.expr(expr),
                        span,
                    }));
                }
            }
            "send_statement" => {
                // `ch <- v` reads both operands; model it as a binary
                // expression so the walker sees the accesses.
                let x = self.opt_expr(node.child_by_field_name("channel"), node);
                let y = self.opt_expr(node.child_by_field_name("value"), node);
                out.push(Stmt::Expr(ExprStmt {
                    expr: Expr::Binary(BinaryExpr {
                        x: Box::new(x),
                        op: "<-".to_string(),
                        y: Box::new(y),
                        span,
                    }),
                    span,
                }));
            }
            "receive_statement" => {
                // `v := <-ch` inside a select case
                let lhs = self.expr_list(node.child_by_field_name("left"));
                let rhs = self.opt_expr(node.child_by_field_name("right"), node);
                if lhs.is_empty() {
                    out.push(Stmt::Expr(ExprStmt { expr: rhs, span }));
                } else {
                    let mut token_cursor = node.walk();
                    let define = node
                        .children(&mut token_cursor)
                        .any(|c| c.kind() == ":=");
                    out.push(Stmt::Assign(AssignStmt {
                        lhs,
                        rhs: vec![rhs],
                        define,
                        span,
                    }));
                }
            }
            "short_var_declaration" => {
                out.push(Stmt::Assign(AssignStmt {
                    lhs: self.expr_list(node.child_by_field_name("left")),
                    rhs: self.expr_list(node.child_by_field_name("right")),
                    define: true,
                    span,
                }));
            }
            "assignment_statement" => {
                out.push(Stmt::Assign(AssignStmt {
                    lhs: self.expr_list(node.child_by_field_name("left")),
                    rhs: self.expr_list(node.child_by_field_name("right")),
                    define: false,
                    span,
                }));
            }
            "inc_statement" | "dec_statement" => {
                if let Some(expr) = node.named_child(0) {
                    out.push(Stmt::IncDec(IncDecStmt {
                        expr: self.expr(expr),
                        span,
                    }));
                }
            }
            "var_declaration" | "const_declaration" => {
                for spec in spec_nodes(node) {
                    if matches!(spec.kind(), "var_spec" | "const_spec") {
                        let var = self.var_spec(spec, Vec::new());
                        out.push(Stmt::Var(VarStmt {
                            names: var.names,
                            type_text: var.type_text,
                            values: var.values,
                            span: self.span(spec),
                        }));
                    }
                }
            }
            "return_statement" => {
                out.push(Stmt::Return(ReturnStmt {
                    values: self.expr_list(node.named_child(0)),
                    span,
                }));
            }
            "if_statement" => out.push(self.if_stmt(node)),
            "for_statement" => out.push(self.for_stmt(node)),
            "expression_switch_statement" | "type_switch_statement" => {
                out.push(self.switch_stmt(node))
            }
            "select_statement" => out.push(self.select_stmt(node)),
            "go_statement" => {
                if let Some(call) = node.named_child(0) {
                    out.push(Stmt::Go(GoStmt {
                        call: self.expr(call),
                        span,
                    }));
                }
            }
            "defer_statement" => {
                if let Some(call) = node.named_child(0) {
                    out.push(Stmt::Defer(DeferStmt {
                        call: self.expr(call),
                        span,
                    }));
                }
            }
            "labeled_statement" => {
                let label_id = node.child_by_field_name("label").map(|l| l.id());
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if Some(child.id()) != label_id {
                        self.stmt_into(child, out);
                    }
                }
            }
            "block" => out.push(Stmt::Block(self.block(node))),
            _ => out.push(Stmt::Other(span)),
        }
    }

    fn if_stmt(&self, node: Node) -> Stmt {
        let init = node
            .child_by_field_name("initializer")
            .map(|n| Box::new(self.stmt(n)));
        let cond = self.opt_expr(node.child_by_field_name("condition"), node);
        let then = node
            .child_by_field_name("consequence")
            .map(|b| self.block(b))
            .unwrap_or_else(|| Block {
                stmts: Vec::new(),
                span: self.span(node),
            });
        let else_arm = node.child_by_field_name("alternative").map(|alt| {
            Box::new(match alt.kind() {
                "if_statement" => self.if_stmt(alt),
                "block" => Stmt::Block(self.block(alt)),
                _ => Stmt::Other(self.span(alt)),
            })
        });
        Stmt::If(IfStmt {
            init,
            cond,
            then,
            else_arm,
            span: self.span(node),
        })
    }

    fn for_stmt(&self, node: Node) -> Stmt {
        let span = self.span(node);
        let body_id = node.child_by_field_name("body").map(|b| b.id());
        let body = node
            .child_by_field_name("body")
            .map(|b| self.block(b))
            .unwrap_or_else(|| Block {
                stmts: Vec::new(),
                span,
            });

        let mut cursor = node.walk();
        if let Some(clause) = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "range_clause")
        {
            let mut lefts = self.expr_list(clause.child_by_field_name("left"));
            let value = if lefts.len() > 1 { lefts.pop() } else { None };
            let key = lefts.into_iter().next();
            let as_ident = |e: Expr| match e {
                Expr::Ident(i) => Some(i),
                _ => None,
            };
            let mut token_cursor = clause.walk();
            let define = clause
                .children(&mut token_cursor)
                .any(|c| c.kind() == ":=");
            let expr = self.opt_expr(clause.child_by_field_name("right"), clause);
            return Stmt::Range(RangeStmt {
                key: key.and_then(as_ident),
                value: value.and_then(as_ident),
                define,
                expr,
                body,
                span,
            });
        }

        // The three-part header nests in a `for_clause` child.
        let mut clause_cursor = node.walk();
        if let Some(clause) = node
            .named_children(&mut clause_cursor)
            .find(|c| c.kind() == "for_clause")
        {
            return Stmt::For(ForStmt {
                init: clause
                    .child_by_field_name("initializer")
                    .map(|n| Box::new(self.stmt(n))),
                cond: clause.child_by_field_name("condition").map(|n| self.expr(n)),
                post: clause
                    .child_by_field_name("update")
                    .map(|n| Box::new(self.stmt(n))),
                body,
                span,
            });
        }

        // `for cond { ... }` carries the condition as a bare child;
        // `for { ... }` has none.
        let mut cond_cursor = node.walk();
        let cond = node
            .named_children(&mut cond_cursor)
            .find(|c| Some(c.id()) != body_id && c.kind() != "comment")
            .map(|n| self.expr(n));

        Stmt::For(ForStmt {
            init: None,
            cond,
            post: None,
            body,
            span,
        })
    }

    fn switch_stmt(&self, node: Node) -> Stmt {
        let init = node
            .child_by_field_name("initializer")
            .map(|n| Box::new(self.stmt(n)));
        // For a type switch the `value` is the guard expression; its
        // operand still gets walked like any read.
        let tag = node.child_by_field_name("value").map(|n| self.expr(n));

        let mut cases = Vec::new();
        let mut cursor = node.walk();
        for case in node.named_children(&mut cursor) {
            match case.kind() {
                "expression_case" | "type_case" | "default_case" => {
                    cases.push(self.case_clause(case));
                }
                _ => {}
            }
        }

        Stmt::Switch(SwitchStmt {
            init,
            tag,
            cases,
            span: self.span(node),
        })
    }

    fn case_clause(&self, case: Node) -> CaseClause {
        // Field children are the case values (or types); everything
        // else that is named is the body.
        let mut field_ids = Vec::new();
        let mut field_cursor = case.walk();
        for value in case.children_by_field_name("value", &mut field_cursor) {
            field_ids.push(value.id());
        }
        let mut type_cursor = case.walk();
        for ty in case.children_by_field_name("type", &mut type_cursor) {
            field_ids.push(ty.id());
        }

        let mut exprs = Vec::new();
        if case.kind() == "expression_case" {
            let mut value_cursor = case.walk();
            for value in case.children_by_field_name("value", &mut value_cursor) {
                exprs.extend(self.expr_list(Some(value)));
            }
        }

        let mut body = Vec::new();
        let mut cursor = case.walk();
        for child in case.named_children(&mut cursor) {
            if !field_ids.contains(&child.id()) {
                self.stmt_into(child, &mut body);
            }
        }

        CaseClause {
            exprs,
            body,
            span: self.span(case),
        }
    }

    fn select_stmt(&self, node: Node) -> Stmt {
        let mut cases = Vec::new();
        let mut cursor = node.walk();
        for case in node.named_children(&mut cursor) {
            match case.kind() {
                "communication_case" => {
                    let comm = case.child_by_field_name("communication");
                    let comm_id = comm.map(|c| c.id());
                    let mut body = Vec::new();
                    let mut case_cursor = case.walk();
                    for child in case.named_children(&mut case_cursor) {
                        if Some(child.id()) != comm_id {
                            self.stmt_into(child, &mut body);
                        }
                    }
                    cases.push(CommClause {
                        comm: comm.map(|c| Box::new(self.stmt(c))),
                        body,
                        span: self.span(case),
                    });
                }
                "default_case" => {
                    let mut body = Vec::new();
                    let mut case_cursor = case.walk();
                    for child in case.named_children(&mut case_cursor) {
                        self.stmt_into(child, &mut body);
                    }
                    cases.push(CommClause {
                        comm: None,
                        body,
                        span: self.span(case),
                    });
                }
                _ => {}
            }
        }
        Stmt::Select(SelectStmt {
            cases,
            span: self.span(node),
        })
    }

    // ── expressions ────────────────────────────────────────────────

    fn expr_list(&self, node: Option<Node>) -> Vec<Expr> {
        let Some(list) = node else {
            return Vec::new();
        };
        if list.kind() != "expression_list" {
            return vec![self.expr(list)];
        }
        let mut exprs = Vec::new();
        let mut cursor = list.walk();
        for child in list.named_children(&mut cursor) {
            exprs.push(self.expr(child));
        }
        exprs
    }

    fn opt_expr(&self, node: Option<Node>, fallback: Node) -> Expr {
        match node {
            Some(n) => self.expr(n),
            None => Expr::Other(self.span(fallback)),
        }
    }

    fn expr(&self, node: Node) -> Expr {
        let span = self.span(node);
        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "package_identifier" => {
                Expr::Ident(self.ident(node))
            }
            "selector_expression" => {
                let x = self.opt_expr(node.child_by_field_name("operand"), node);
                let sel = node
                    .child_by_field_name("field")
                    .map(|n| self.ident(n))
                    .unwrap_or_else(|| Ident::new("", span));
                Expr::Selector(SelectorExpr {
                    x: Box::new(x),
                    sel,
                    span,
                })
            }
            "call_expression" => {
                let func = self.opt_expr(node.child_by_field_name("function"), node);
                let mut args = Vec::new();
                if let Some(list) = node.child_by_field_name("arguments") {
                    let mut cursor = list.walk();
                    for arg in list.named_children(&mut cursor) {
                        args.push(self.expr(arg));
                    }
                }
                Expr::Call(CallExpr {
                    func: Box::new(func),
                    args,
                    span,
                })
            }
            "index_expression" => Expr::Index(IndexExpr {
                x: Box::new(self.opt_expr(node.child_by_field_name("operand"), node)),
                index: Box::new(self.opt_expr(node.child_by_field_name("index"), node)),
                span,
            }),
            "unary_expression" => {
                let op = node
                    .child_by_field_name("operator")
                    .map(|n| self.text(n))
                    .unwrap_or_default();
                let x = Box::new(self.opt_expr(node.child_by_field_name("operand"), node));
                if op == "*" {
                    Expr::Star(StarExpr { x, span })
                } else {
                    Expr::Unary(UnaryExpr { op, x, span })
                }
            }
            "binary_expression" => Expr::Binary(BinaryExpr {
                x: Box::new(self.opt_expr(node.child_by_field_name("left"), node)),
                op: node
                    .child_by_field_name("operator")
                    .map(|n| self.text(n))
                    .unwrap_or_default(),
                y: Box::new(self.opt_expr(node.child_by_field_name("right"), node)),
                span,
            }),
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.expr(inner),
                None => Expr::Other(span),
            },
            "type_assertion_expression" | "type_conversion_expression" => {
                self.opt_expr(node.child_by_field_name("operand"), node)
            }
            "composite_literal" => {
                let type_text = node.child_by_field_name("type").map(|t| self.text(t));
                let mut elements = Vec::new();
                if let Some(body) = node.child_by_field_name("body") {
                    let mut cursor = body.walk();
                    for element in body.named_children(&mut cursor) {
                        elements.push(self.literal_element(element));
                    }
                }
                Expr::Composite(CompositeLit {
                    type_text,
                    elements,
                    span,
                })
            }
            "func_literal" => {
                let body = node
                    .child_by_field_name("body")
                    .map(|b| self.block(b))
                    .unwrap_or_else(|| Block {
                        stmts: Vec::new(),
                        span,
                    });
                Expr::FuncLit(FuncLit { body, span })
            }
            "int_literal" | "float_literal" | "imaginary_literal" | "rune_literal"
            | "interpreted_string_literal" | "raw_string_literal" | "true" | "false" | "nil"
            | "iota" => Expr::Basic(BasicLit {
                value: self.text(node),
                span,
            }),
            "slice_expression" => Expr::Other(span),
            _ => Expr::Other(span),
        }
    }

    /// Element of a composite literal body. Keyed elements contribute
    /// their value; the key is either a field name or a constant and
    /// never an access we track.
    fn literal_element(&self, node: Node) -> Expr {
        match node.kind() {
            "keyed_element" => {
                let mut cursor = node.walk();
                let last = node.named_children(&mut cursor).last();
                match last {
                    Some(value) => self.literal_element(value),
                    None => Expr::Other(self.span(node)),
                }
            }
            "literal_element" => match node.named_child(0) {
                Some(inner) => self.expr(inner),
                None => Expr::Other(self.span(node)),
            },
            "literal_value" => Expr::Composite(CompositeLit {
                type_text: None,
                elements: Vec::new(),
                span: self.span(node),
            }),
            _ => self.expr(node),
        }
    }
}
