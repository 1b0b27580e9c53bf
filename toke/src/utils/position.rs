//! Source location tracking
//!
//! The scanner works on raw bytes, so a position counts bytes: every byte
//! advances the column by one and a newline starts the next line.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source input with line, column, and byte offset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Byte offset from start of input (0-based)
    pub offset: usize,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Position {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// Create the starting position (offset 0, line 1, column 1)
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advance position past one byte
    pub fn advance(self, byte: u8) -> Self {
        match byte {
            b'\n' => Self {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            },
            _ => Self {
                offset: self.offset + 1,
                line: self.line,
                column: self.column + 1,
            },
        }
    }

    /// Advance position past every byte of `bytes`
    pub fn advance_bytes(self, bytes: &[u8]) -> Self {
        bytes.iter().fold(self, |pos, &byte| pos.advance(byte))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position() {
        let pos = Position::start();
        assert_eq!((pos.offset, pos.line, pos.column), (0, 1, 1));
        assert_eq!(pos.to_string(), "1:1");
    }

    #[test]
    fn test_advance_over_newline() {
        let pos = Position::start().advance(b'a').advance(b'\n');
        assert_eq!(pos, Position::new(2, 2, 1));
    }

    #[test]
    fn test_tab_counts_as_one_column() {
        let pos = Position::start().advance(b'\t');
        assert_eq!(pos.column, 2);
    }

    #[test]
    fn test_advance_bytes() {
        let pos = Position::start().advance_bytes(b"ab\ncd");
        assert_eq!(pos, Position::new(5, 2, 3));
    }
}
