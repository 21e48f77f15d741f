//! Go-subset syntax tree
//!
//! A closed set of declaration, statement and expression forms covering
//! what the checkers interpret. Constructs outside the subset are
//! lowered to [`Stmt::Other`] / [`Expr::Other`] and ignored by the
//! walkers, so an unsupported statement never aborts analysis.
//!
//! All nodes carry a [`Span`]; declarations and struct fields also carry
//! the doc-comment lines attached to them in source, which is where lock
//! annotations live.

use crate::shared::models::Span;
use std::path::PathBuf;

/// One parsed Go source file
#[derive(Debug, Clone, PartialEq)]
pub struct GoFile {
    pub path: PathBuf,
    pub package: String,
    pub decls: Vec<Decl>,
}

/// Identifier with its source position
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Declarations
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeDecl),
    Var(VarDecl),
}

/// Function or method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: Ident,
    pub receiver: Option<Receiver>,
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    pub body: Option<Block>,
    pub doc: Vec<String>,
    pub span: Span,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Method receiver. The name is absent for `func (T) f()` forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Receiver {
    pub name: Option<Ident>,
    /// Receiver base type name with any leading `*` stripped
    pub type_name: String,
    pub span: Span,
}

/// Parameter group: `a, b int` yields one Param with two names.
/// Unnamed results yield an empty name list.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub names: Vec<Ident>,
    pub type_text: String,
    pub span: Span,
}

/// Type declaration. Only struct types expose fields; everything else
/// is kept as raw type text.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Ident,
    pub fields: Vec<Field>,
    pub is_struct: bool,
    pub doc: Vec<String>,
    pub span: Span,
}

/// Named struct field. Embedded fields are not modeled.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<Ident>,
    pub type_text: String,
    pub doc: Vec<String>,
    pub span: Span,
}

/// Package-level `var` (or `const`) specification
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub names: Vec<Ident>,
    pub type_text: Option<String>,
    pub values: Vec<Expr>,
    pub doc: Vec<String>,
    pub span: Span,
}

// ───────────────────────────────────────────────────────────────────
// Statements
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(ExprStmt),
    Assign(AssignStmt),
    IncDec(IncDecStmt),
    Var(VarStmt),
    Return(ReturnStmt),
    If(IfStmt),
    For(ForStmt),
    Range(RangeStmt),
    Switch(SwitchStmt),
    Select(SelectStmt),
    Go(GoStmt),
    Defer(DeferStmt),
    Block(Block),
    /// Statement kinds the checkers do not interpret (break, continue,
    /// goto, fallthrough, ...)
    Other(Span),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Expr(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::IncDec(s) => s.span,
            Stmt::Var(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Range(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Select(s) => s.span,
            Stmt::Go(s) => s.span,
            Stmt::Defer(s) => s.span,
            Stmt::Block(b) => b.span,
            Stmt::Other(span) => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub rhs: Vec<Expr>,
    /// `:=` short declaration
    pub define: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncDecStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Local `var` statement
#[derive(Debug, Clone, PartialEq)]
pub struct VarStmt {
    pub names: Vec<Ident>,
    pub type_text: Option<String>,
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then: Block,
    /// `else` block or chained `else if`
    pub else_arm: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub key: Option<Ident>,
    pub value: Option<Ident>,
    pub define: bool,
    pub expr: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub cases: Vec<CaseClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub exprs: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectStmt {
    pub cases: Vec<CommClause>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoStmt {
    pub call: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeferStmt {
    pub call: Expr,
    pub span: Span,
}

// ───────────────────────────────────────────────────────────────────
// Expressions
// ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Selector(SelectorExpr),
    Call(CallExpr),
    Index(IndexExpr),
    /// Pointer dereference `*x`
    Star(StarExpr),
    /// Other unary operators (`&x`, `!x`, `-x`, `<-ch`); transparent to
    /// operation expansion
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Composite(CompositeLit),
    FuncLit(FuncLit),
    /// Literal constant (int, string, rune, bool, nil)
    Basic(BasicLit),
    Other(Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident(i) => i.span,
            Expr::Selector(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::Index(e) => e.span,
            Expr::Star(e) => e.span,
            Expr::Unary(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Composite(e) => e.span,
            Expr::FuncLit(e) => e.span,
            Expr::Basic(e) => e.span,
            Expr::Other(span) => *span,
        }
    }

    /// Compact source-like rendering, used for index-path segments and
    /// diagnostics
    pub fn text(&self) -> String {
        match self {
            Expr::Ident(i) => i.name.clone(),
            Expr::Selector(e) => format!("{}.{}", e.x.text(), e.sel.name),
            Expr::Call(e) => format!("{}()", e.func.text()),
            Expr::Index(e) => format!("{}[{}]", e.x.text(), e.index.text()),
            Expr::Star(e) => format!("*{}", e.x.text()),
            Expr::Unary(e) => format!("{}{}", e.op, e.x.text()),
            Expr::Binary(e) => format!("{} {} {}", e.x.text(), e.op, e.y.text()),
            Expr::Composite(e) => match &e.type_text {
                Some(t) => format!("{}{{}}", t),
                None => "{}".to_string(),
            },
            Expr::FuncLit(_) => "func()".to_string(),
            Expr::Basic(b) => b.value.clone(),
            Expr::Other(_) => "_".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub x: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarExpr {
    pub x: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: String,
    pub x: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op: String,
    pub y: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    pub type_text: Option<String>,
    pub elements: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicLit {
    pub value: String,
    pub span: Span,
}
