//! Operation chains
//!
//! The checkers do not walk expressions; they walk flat chains of
//! operations distilled from them. A selector chain prepends its reads
//! (`t.mu.Lock()` becomes `[r:t r:mu e:Lock]`), a call appends its exec
//! with the argument chains nested inside, an index or deref nests its
//! operand chains. The chain order is evaluation order, which is what
//! makes guard checks and lock actions fire at the right point.

use crate::features::syntax::domain::Block;
use crate::shared::models::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Read(ReadOp),
    Write(WriteOp),
    Exec(ExecOp),
    Index(IndexOp),
    Deref(DerefOp),
    New(NewOp),
}

impl Operation {
    pub fn span(&self) -> Span {
        match self {
            Operation::Read(op) => op.span,
            Operation::Write(op) => op.span,
            Operation::Exec(op) => op.span,
            Operation::Index(op) => op.span,
            Operation::Deref(op) => op.span,
            Operation::New(op) => op.span,
        }
    }
}

/// Read of one path segment (identifier or field)
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOp {
    pub name: String,
    pub span: Span,
}

/// Assignment to the path named by `lhs`. The rhs chain is carried for
/// rendering; its effects are emitted as separate chains ahead of the
/// write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOp {
    pub lhs: OperationChain,
    pub rhs: OperationChain,
    pub span: Span,
}

/// Call. `name` is empty and `body` set for function-literal calls,
/// which execute inline where they appear.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecOp {
    pub name: String,
    pub args: Vec<OperationChain>,
    pub body: Option<Block>,
    pub span: Span,
}

/// Indexing `x[index]`. `index_text` keeps the source rendering of the
/// index expression for composite path segments like `locks[key]`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexOp {
    pub x: OperationChain,
    pub index: OperationChain,
    pub index_text: String,
    pub span: Span,
}

/// Pointer dereference; transparent for path purposes
#[derive(Debug, Clone, PartialEq)]
pub struct DerefOp {
    pub x: OperationChain,
    pub span: Span,
}

/// Composite literal construction
#[derive(Debug, Clone, PartialEq)]
pub struct NewOp {
    pub type_text: String,
    pub inits: Vec<OperationChain>,
    pub span: Span,
}

/// Flat operation sequence for one expression or statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationChain {
    pub ops: Vec<Operation>,
}

impl OperationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ops(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Splice nested index/deref operand chains into the top level.
    ///
    /// `level` bounds the splice depth; negative means unbounded. An
    /// index op splices as index-then-operand, so the chain stays in
    /// evaluation order. Reads, execs, writes and news are atomic and
    /// survive flattening unchanged.
    pub fn flatten(&self, level: i32) -> OperationChain {
        if level == 0 {
            return self.clone();
        }
        let mut ops = Vec::with_capacity(self.ops.len());
        for op in &self.ops {
            match op {
                Operation::Index(ix) => {
                    ops.extend(ix.index.flatten(level - 1).ops);
                    ops.extend(ix.x.flatten(level - 1).ops);
                }
                Operation::Deref(dx) => {
                    ops.extend(dx.x.flatten(level - 1).ops);
                }
                other => ops.push(other.clone()),
            }
        }
        OperationChain { ops }
    }
}

impl fmt::Display for OperationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, op) in self.ops.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", op)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read(op) => write!(f, "r:{}", op.name),
            Operation::Write(op) => write!(f, "w:{}={}", op.lhs, op.rhs),
            Operation::Exec(op) => {
                if op.body.is_some() {
                    write!(f, "e:func()")?;
                } else {
                    write!(f, "e:{}", op.name)?;
                }
                if !op.args.is_empty() {
                    write!(f, "(")?;
                    for (i, arg) in op.args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Operation::Index(op) => write!(f, "i:{}[{}]", op.x, op.index_text),
            Operation::Deref(op) => write!(f, "d:{}", op.x),
            Operation::New(op) => write!(f, "n:{}", op.type_text),
        }
    }
}
