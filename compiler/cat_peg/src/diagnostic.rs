//! Position diagnostics: the offending source line and a caret under the
//! failing column.
//!
//! A [`Diagnostic`] is a pure function of the cursor text and an offset. It
//! is only computed on the error path, so it scans the text rather than
//! keeping a line table around.

use std::fmt;

use crate::cursor::Cursor;

/// Line/column location of an offset plus the text of its line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Zero-based line number.
    pub line: u32,
    /// Zero-based column, counted in characters.
    pub column: u32,
    /// The source line containing the offset, without terminator.
    pub line_text: String,
}

impl Diagnostic {
    /// Locate `position` within the cursor's source text.
    pub fn at(cursor: &Cursor<'_>, position: u32) -> Self {
        let (line, column) = cursor.line_and_column(position);
        Diagnostic {
            line,
            column,
            line_text: cursor.line_text(position).to_owned(),
        }
    }

    /// Locate the cursor's current position.
    pub fn here(cursor: &Cursor<'_>) -> Self {
        Self::at(cursor, cursor.position())
    }

    /// The caret line: `column` spaces followed by `^`.
    pub fn caret(&self) -> String {
        let mut caret = " ".repeat(self.column as usize);
        caret.push('^');
        caret
    }
}

/// Renders the source line followed by the caret line.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.line_text)?;
        write!(f, "{}", self.caret())
    }
}
