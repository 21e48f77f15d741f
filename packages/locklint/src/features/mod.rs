//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations
//!
//! Leaves first: syntax and lock_protocol have no feature dependencies;
//! parsing produces syntax trees; flow, operations, objects and
//! package_desc each consume syntax; checking sits on top of all of
//! them.

pub mod annotations;
pub mod checking;
pub mod flow;
pub mod lock_protocol;
pub mod objects;
pub mod operations;
pub mod package_desc;
pub mod parsing;
pub mod syntax;
