//! Error types.
//!
//! - [`ParseError`]: the single fatal failure surfaced by a failed parse.
//! - [`GrammarError`]: a malformed rule table (duplicate or missing names).
//! - [`GrammarParseError`]: either of the above, returned by
//!   [`Grammar::parse_rule`](crate::Grammar::parse_rule).
//!
//! Backtrack failures never become errors; they are
//! [`MatchOutcome::Backtrack`](crate::MatchOutcome::Backtrack) and carry no
//! payload.

use crate::cursor::Cursor;
use crate::diagnostic::Diagnostic;

/// A fatal parse failure.
///
/// Produced by a commit point (`no_fail`) whose inner rule did not match,
/// or by the parse driver itself (nothing matched, nesting too deep, source
/// too large). Line and column are zero-based; `Display` prints them
/// one-based.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} (line {}, column {})", .line + 1, .column + 1)]
pub struct ParseError {
    /// Byte offset of the failure.
    pub position: u32,
    /// Zero-based line of `position`.
    pub line: u32,
    /// Zero-based column of `position`, in characters.
    pub column: u32,
    /// Human-readable description.
    pub message: String,
    /// Text of the line containing `position`.
    pub source_line: String,
}

impl ParseError {
    /// Create an error at `position` within the cursor's source.
    #[cold]
    pub fn new(cursor: &Cursor<'_>, position: u32, message: impl Into<String>) -> Self {
        let Diagnostic {
            line,
            column,
            line_text,
        } = Diagnostic::at(cursor, position);
        ParseError {
            position,
            line,
            column,
            message: message.into(),
            source_line: line_text,
        }
    }

    /// Create an error at the cursor's current position.
    #[cold]
    pub fn here(cursor: &Cursor<'_>, message: impl Into<String>) -> Self {
        Self::new(cursor, cursor.position(), message)
    }

    /// Create an error that has no meaningful source location.
    #[cold]
    pub(crate) fn unlocated(message: impl Into<String>) -> Self {
        ParseError {
            position: 0,
            line: 0,
            column: 0,
            message: message.into(),
            source_line: String::new(),
        }
    }

    /// The line/caret part of the diagnostic.
    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            line: self.line,
            column: self.column,
            line_text: self.source_line.clone(),
        }
    }

    /// The full diagnostic: message, source line, caret line.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.message, self.diagnostic())
    }
}

/// A rule table that cannot be built or queried.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// Two rules were registered under the same name.
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(&'static str),
    /// The entry rule named at construction was never defined.
    #[error("entry rule `{0}` is not defined")]
    UnknownEntry(&'static str),
    /// A lookup named a rule that does not exist.
    #[error("no rule named `{0}`")]
    UnknownRule(String),
}

/// Failure of [`Grammar::parse_rule`](crate::Grammar::parse_rule).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarParseError {
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
