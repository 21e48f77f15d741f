//! Source location types
//!
//! Positions carry both line/column (for report rendering) and byte
//! offsets (for stable report ordering within a file).

use serde::{Deserialize, Serialize};

/// Single location in source code (1-based line, 0-based column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Location {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Span in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Create a span covering a single point
    pub fn point(line: u32, column: u32, offset: u32) -> Self {
        let loc = Location::new(line, column, offset);
        Self::new(loc, loc)
    }

    /// Create a zero span (1:0-1:0)
    pub fn zero() -> Self {
        Self::new(Location::default(), Location::default())
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_collapses_to_one_location() {
        let span = Span::point(12, 4, 180);
        assert_eq!(span.start, span.end);
        assert_eq!(span.start.line, 12);
        assert_eq!(span.start.column, 4);
        assert_eq!(span.start.offset, 180);
    }

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Span::zero(), Span::default());
        assert_eq!(Span::zero().start, Location::new(1, 0, 0));
    }
}
