//! Annotation domain model

pub mod annotation;

pub use annotation::{Annotation, AnnotationKind};
