//! Flow use cases

pub mod builder;

pub use builder::build_flow;
