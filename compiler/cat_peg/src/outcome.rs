//! Three-way match result.
//!
//! | Variant | Meaning | Who handles it |
//! |---------|---------|----------------|
//! | `Matched` | The rule matched; cursor and tree moved forward | caller continues |
//! | `Backtrack` | "Not here"; state already restored | `choice`, `star`, `opt`, `not` |
//! | `Fatal` | Input is invalid past a commit point | nobody but `not`; aborts the parse |
//!
//! A backtrack carries no payload. A fatal failure carries the one
//! [`ParseError`] that will be reported: propagation is immediate, so the
//! first fatal failure raised is the one the caller sees.

use crate::error::ParseError;

/// Result of matching one rule at the current position.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use]
pub enum MatchOutcome {
    /// The rule matched.
    Matched,
    /// The rule did not match; try something else.
    Backtrack,
    /// The rule hit a commit point and failed; stop parsing.
    Fatal(ParseError),
}

impl MatchOutcome {
    /// Create a fatal outcome.
    #[cold]
    pub fn fatal(error: ParseError) -> Self {
        MatchOutcome::Fatal(error)
    }

    /// `Matched` if `matched` is true, `Backtrack` otherwise.
    #[inline]
    pub fn from_bool(matched: bool) -> Self {
        if matched {
            MatchOutcome::Matched
        } else {
            MatchOutcome::Backtrack
        }
    }

    // === Predicates ===

    /// Returns `true` if the rule matched.
    #[inline]
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched)
    }

    /// Returns `true` for an ordinary, recoverable failure.
    #[inline]
    pub fn is_backtrack(&self) -> bool {
        matches!(self, MatchOutcome::Backtrack)
    }

    /// Returns `true` for a committed failure.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, MatchOutcome::Fatal(_))
    }

    // === Transformations ===

    /// Turn a backtrack into a fatal failure built by `make_error`.
    ///
    /// This is the commit-point conversion used by `no_fail`.
    pub fn or_fatal(self, make_error: impl FnOnce() -> ParseError) -> Self {
        match self {
            MatchOutcome::Backtrack => MatchOutcome::Fatal(make_error()),
            other => other,
        }
    }

    /// Invert for negative lookahead: matched becomes backtrack, and both
    /// backtrack and fatal become matched. Lookahead never commits, so a
    /// fatal failure inside it is discarded.
    pub fn negate(self) -> Self {
        match self {
            MatchOutcome::Matched => MatchOutcome::Backtrack,
            MatchOutcome::Backtrack | MatchOutcome::Fatal(_) => MatchOutcome::Matched,
        }
    }

    /// Convert to a `Result`: `Ok(true)` matched, `Ok(false)` backtracked.
    pub fn into_result(self) -> Result<bool, ParseError> {
        match self {
            MatchOutcome::Matched => Ok(true),
            MatchOutcome::Backtrack => Ok(false),
            MatchOutcome::Fatal(error) => Err(error),
        }
    }

    /// The fatal error, if any.
    pub fn fatal_error(&self) -> Option<&ParseError> {
        match self {
            MatchOutcome::Fatal(error) => Some(error),
            _ => None,
        }
    }
}
