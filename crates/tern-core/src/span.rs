//! Source code span tracking for error reporting.

use serde::{Deserialize, Serialize};

/// Represents a location in source code (line, column, and byte offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Location {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            offset: 0,
        }
    }

    #[must_use]
    pub const fn with_offset(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    const fn key(self) -> (usize, usize) {
        (self.line, self.column)
    }
}

/// Represents a span of source code with start and end locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    #[must_use]
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Creates a span from byte offsets only.
    #[must_use]
    pub const fn from_range(start: usize, end: usize) -> Self {
        Self {
            start: Location::with_offset(0, 0, start),
            end: Location::with_offset(0, 0, end),
        }
    }

    /// Creates a span covering a single line between two columns.
    #[must_use]
    pub const fn on_line(line: usize, start_column: usize, end_column: usize) -> Self {
        Self {
            start: Location::new(line, start_column),
            end: Location::new(line, end_column),
        }
    }

    /// Checks if a location is contained within this span.
    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        self.start.key() <= location.key() && location.key() <= self.end.key()
    }

    /// Merges two spans into a single span covering both.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let start = if self.start.key() <= other.start.key() {
            self.start
        } else {
            other.start
        };
        let end = if self.end.key() >= other.end.key() {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let span = Span::new(Location::new(1, 4), Location::new(3, 2));
        assert!(span.contains(Location::new(2, 80)));
        assert!(span.contains(Location::new(1, 4)));
        assert!(!span.contains(Location::new(1, 3)));
        assert!(!span.contains(Location::new(3, 3)));
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = Span::on_line(1, 0, 5);
        let b = Span::on_line(2, 3, 9);
        assert_eq!(a.merge(b), b.merge(a));
        assert_eq!(a.merge(b).start, Location::new(1, 0));
        assert_eq!(a.merge(b).end, Location::new(2, 9));
    }
}
