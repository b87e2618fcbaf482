//! Character cursor over immutable source text.
//!
//! The cursor owns a single read position into a borrowed `&str`. Positions
//! are byte offsets and always sit on a `char` boundary: [`Cursor::advance`]
//! moves over one whole character. Backtracking is [`Cursor::save`] followed
//! later by [`Cursor::restore`], both O(1) and allocation-free.
//!
//! Line/column lookup scans the text with `memchr` and is only meant for the
//! error path.

use memchr::{memchr, memchr_iter, memrchr};

/// Reading past the last character of the input.
///
/// Primitive rules treat this as an ordinary backtrack, never as a fatal
/// failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unexpected end of input at offset {position}")]
pub struct EndOfInput {
    /// Offset at which the read was attempted (always the text length).
    pub position: u32,
}

/// A saved cursor position, produced by [`Cursor::save`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mark(u32);

impl Mark {
    /// The byte offset this mark points at.
    #[inline]
    pub const fn position(self) -> u32 {
        self.0
    }
}

/// Read position over the source text being parsed.
///
/// # Invariant
///
/// `pos <= text.len()` and `pos` is a `char` boundary of `text`.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'src> {
    text: &'src str,
    pos: u32,
}

/// Size assertion: a fat pointer plus one `u32` (padded).
const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'src> Cursor<'src> {
    /// Create a cursor at offset 0.
    ///
    /// # Contract
    ///
    /// `text.len()` must fit in a `u32`; [`crate::parse`] checks this before
    /// constructing a cursor.
    pub fn new(text: &'src str) -> Self {
        debug_assert!(
            u32::try_from(text.len()).is_ok(),
            "source of {} bytes exceeds u32 offsets",
            text.len()
        );
        Cursor { text, pos: 0 }
    }

    /// The full source text.
    #[inline]
    pub fn source(&self) -> &'src str {
        self.text
    }

    /// Current byte offset.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Returns `true` once every character has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos as usize >= self.text.len()
    }

    /// The text not yet consumed.
    #[inline]
    pub fn remaining(&self) -> &'src str {
        self.text.get(self.pos as usize..).unwrap_or_default()
    }

    /// The character at the current position.
    #[inline]
    pub fn peek(&self) -> Result<char, EndOfInput> {
        self.remaining()
            .chars()
            .next()
            .ok_or(EndOfInput { position: self.pos })
    }

    /// Consume and return the character at the current position.
    #[inline]
    pub fn advance(&mut self) -> Result<char, EndOfInput> {
        let ch = self.peek()?;
        self.pos += utf8_len(ch);
        Ok(ch)
    }

    /// If the remaining text starts with `expected`, consume it and return
    /// `true`. Otherwise return `false` without moving.
    #[must_use]
    pub fn eat(&mut self, expected: &str) -> bool {
        if !self.remaining().starts_with(expected) {
            return false;
        }
        // starts_with succeeded, so the length is bounded by the text length
        self.pos += u32::try_from(expected.len()).unwrap_or(0);
        true
    }

    /// Save the current position for a later [`restore`](Self::restore).
    #[inline]
    pub fn save(&self) -> Mark {
        Mark(self.pos)
    }

    /// Move back to a previously saved position.
    #[inline]
    pub fn restore(&mut self, mark: Mark) {
        debug_assert!(
            mark.0 as usize <= self.text.len(),
            "mark {} out of bounds (max {})",
            mark.0,
            self.text.len()
        );
        self.pos = mark.0;
    }

    /// Zero-based `(line, column)` of a byte offset.
    ///
    /// The column counts characters, not bytes, from the start of the line.
    /// Offsets past the end are clamped to the end of the text.
    pub fn line_and_column(&self, pos: u32) -> (u32, u32) {
        let pos = self.clamp(pos);
        let before = &self.text.as_bytes()[..pos];
        let line = memchr_iter(b'\n', before).count();
        let line_start = line_start(before);
        let column = self
            .text
            .get(line_start..pos)
            .map_or(0, |s| s.chars().count());
        (saturating_u32(line), saturating_u32(column))
    }

    /// The source line containing `pos`, without its line terminator.
    pub fn line_text(&self, pos: u32) -> &'src str {
        let pos = self.clamp(pos);
        let bytes = self.text.as_bytes();
        let start = line_start(&bytes[..pos]);
        let end = memchr(b'\n', &bytes[pos..]).map_or(bytes.len(), |i| pos + i);
        let line = self.text.get(start..end).unwrap_or_default();
        line.strip_suffix('\r').unwrap_or(line)
    }

    fn clamp(&self, pos: u32) -> usize {
        (pos as usize).min(self.text.len())
    }
}

/// Offset just after the last newline in `before`, or 0.
fn line_start(before: &[u8]) -> usize {
    memrchr(b'\n', before).map_or(0, |i| i + 1)
}

#[inline]
fn utf8_len(ch: char) -> u32 {
    // len_utf8 is at most 4
    saturating_u32(ch.len_utf8())
}

#[inline]
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
