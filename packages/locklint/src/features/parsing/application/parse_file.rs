//! File-level parse entry point.

use std::path::PathBuf;

use crate::errors::Result;
use crate::features::parsing::infrastructure::GoParser;
use crate::features::syntax::GoFile;

/// Parse Go source held in memory. Builds a fresh parser per call;
/// bulk runs reuse one [`GoParser`] per worker instead.
pub fn parse_go_source(source: &str, path: PathBuf) -> Result<GoFile> {
    GoParser::new()?.parse(source, path)
}
