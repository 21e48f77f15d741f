//! Annotation tag scanner
//!
//! Extracts annotation records from doc-comment lines. A line
//! participates when it contains the configured tag; everything after
//! the tag is a comma-separated list of records:
//!
//! ```text
//! locklint:t.mu.RLock, !t.other.Lock
//! ```
//!
//! Records that do not fit the grammar (missing action suffix, empty
//! object path) are dropped with a warning rather than failing the
//! whole file.

use crate::features::annotations::domain::{Annotation, AnnotationKind};
use crate::features::syntax::ObjectPath;
use tracing::warn;

/// Default annotation tag
pub const DEFAULT_TAG: &str = "locklint:";

/// Parse every annotation record found in `doc`
pub fn parse_annotations(doc: &[String], tag: &str) -> Vec<Annotation> {
    let mut out = Vec::new();
    for line in doc {
        let Some(pos) = line.find(tag) else {
            continue;
        };
        let rest = &line[pos + tag.len()..];
        for record in rest.split(',') {
            let record = record.trim();
            if record.is_empty() {
                continue;
            }
            match parse_record(record) {
                Some(ann) => out.push(ann),
                None => warn!(record, "dropping malformed lock annotation"),
            }
        }
    }
    out
}

/// Parse one `[!]path.{Lock|RLock}` record
fn parse_record(record: &str) -> Option<Annotation> {
    let (negated, body) = match record.strip_prefix('!') {
        Some(body) => (true, body),
        None => (false, record),
    };

    let segments: Vec<&str> = body.split('.').collect();
    if segments.len() < 2 {
        return None;
    }

    let kind = AnnotationKind::from_suffix(segments[segments.len() - 1])?;
    let path: Vec<String> = segments[..segments.len() - 1]
        .iter()
        .map(|s| s.trim().to_string())
        .collect();
    if path.iter().any(String::is_empty) {
        return None;
    }

    Some(Annotation::new(
        ObjectPath::from_segments(path),
        kind,
        negated,
    ))
}
