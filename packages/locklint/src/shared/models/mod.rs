//! Shared model types used across features

mod object_id;
mod span;

pub use object_id::ObjectId;
pub use span::{Location, Span};
