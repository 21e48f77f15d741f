//! Operation domain model

pub mod operation;

pub use operation::{
    DerefOp, ExecOp, IndexOp, NewOp, Operation, OperationChain, ReadOp, WriteOp,
};
