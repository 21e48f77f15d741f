//! tree-sitter front end
//!
//! Wraps the Go grammar and rejects files with syntax errors up front;
//! the checkers only ever see well-formed trees.

use std::path::PathBuf;

use tree_sitter::{Node, Parser};

use crate::errors::{LocklintError, Result};
use crate::features::parsing::infrastructure::lowering;
use crate::features::syntax::GoFile;

pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::language())
            .map_err(|e| LocklintError::analysis(format!("loading Go grammar: {e}")))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str, path: PathBuf) -> Result<GoFile> {
        let display = path.display().to_string();
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| LocklintError::parse(&display, "parser produced no tree"))?;

        let root = tree.root_node();
        if root.has_error() {
            let mut spots = Vec::new();
            collect_error_spots(root, &mut spots);
            let positions = spots
                .iter()
                .map(|(line, column)| format!("{line}:{column}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(LocklintError::parse(
                &display,
                format!("syntax error at {positions}"),
            ));
        }

        Ok(lowering::lower_file(root, source, path))
    }
}

const MAX_ERROR_SPOTS: usize = 3;

fn collect_error_spots(node: Node, spots: &mut Vec<(usize, usize)>) {
    if spots.len() >= MAX_ERROR_SPOTS {
        return;
    }
    if node.is_error() || node.is_missing() {
        let pos = node.start_position();
        spots.push((pos.row + 1, pos.column));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_spots(child, spots);
    }
}
