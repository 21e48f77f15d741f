//! Flow domain model

pub mod flow;

pub use flow::{ExitKind, Flow, FlowNode};
