//! Syntax domain model

pub mod ast;
pub mod path;

pub use ast::{
    AssignStmt, BasicLit, BinaryExpr, Block, CallExpr, CaseClause, CommClause, CompositeLit, Decl,
    DeferStmt, Expr, ExprStmt, Field, ForStmt, FuncDecl, FuncLit, GoFile, GoStmt, Ident,
    IfStmt, IncDecStmt, IndexExpr, Param, RangeStmt, Receiver, ReturnStmt, SelectStmt,
    SelectorExpr, StarExpr, Stmt, SwitchStmt, TypeDecl, UnaryExpr, VarDecl, VarStmt,
};
pub use path::ObjectPath;
