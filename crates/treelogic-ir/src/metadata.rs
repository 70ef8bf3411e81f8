//! Source location tracking for diagnostics.

use serde::{Deserialize, Serialize};

/// Source code location information
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        SourceLocation {
            file: file.into(),
            line,
            column,
        }
    }

    pub fn unknown() -> Self {
        SourceLocation {
            file: "<unknown>".to_string(),
            line: 0,
            column: 0,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Span information covering a range in source code
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        SourceSpan { start, end }
    }

    pub fn single(location: SourceLocation) -> Self {
        SourceSpan {
            start: location.clone(),
            end: location,
        }
    }

    pub fn unknown() -> Self {
        SourceSpan {
            start: SourceLocation::unknown(),
            end: SourceLocation::unknown(),
        }
    }
}

impl std::fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start.file == self.end.file {
            if self.start.line == self.end.line {
                write!(
                    f,
                    "{}:{}:{}-{}",
                    self.start.file, self.start.line, self.start.column, self.end.column
                )
            } else {
                write!(
                    f,
                    "{} (lines {}-{})",
                    self.start.file, self.start.line, self.end.line
                )
            }
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}
