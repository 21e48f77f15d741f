//! Annotation use cases

pub mod tag_parser;

pub use tag_parser::{parse_annotations, DEFAULT_TAG};
