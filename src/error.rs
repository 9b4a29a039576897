//! Error and warning types for the parse pipeline.
//!
//! Lex and parse errors are fatal for the enclosing file and carry the byte
//! offset and line of the offending input. Annotation problems are
//! recoverable at doc-comment granularity and surface as [`Warning`] values
//! alongside the parsed document.

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    #[error("undefined escape sequence: \\{0}")]
    UndefinedEscape(char),
    #[error("expected a character after backslash")]
    TrailingBackslash,
    #[error("unterminated quoted argument")]
    UnterminatedQuote,
    #[error("unterminated bracket region")]
    UnterminatedBracket,
}

/// A lexer error with source location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line} (byte {offset})")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub offset: usize,
    pub line: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof { expected: &'static str },
}

/// A structural parser error with source location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line} (byte {offset})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
    pub line: usize,
}

/// Fatal error for a single source file. No partial document is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Recoverable problem found while resolving doc-comment annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
