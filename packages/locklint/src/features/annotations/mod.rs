/*
 * Lock Annotations
 *
 * Doc-comment records binding lock requirements to declarations:
 * - On a function: callers must hold the named lock (contract)
 * - On a struct field / package var: accesses require the named lock
 *   (guard)
 * - `!` negates: callers must NOT hold
 *
 * Grammar: after the tag, comma-separated `[!]path.{Lock|RLock}`
 * records. Malformed records are dropped with a warning.
 *
 * Architecture:
 * - Domain: Annotation, AnnotationKind
 * - Application: tag scanner over doc-comment lines
 */

pub mod application;
pub mod domain;

// Re-export main types
pub use application::{parse_annotations, DEFAULT_TAG};
pub use domain::{Annotation, AnnotationKind};
