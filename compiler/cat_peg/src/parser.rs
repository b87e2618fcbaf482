//! Per-parse state and the parse driver.
//!
//! A [`Parser`] pairs one [`Cursor`] with one [`AstBuilder`]. Rules receive
//! it by `&mut` and are the only thing that moves it; nothing about a parse
//! is shared between parses, so separate threads can parse concurrently with
//! the same (immutable) rules.
//!
//! # Snapshots
//!
//! [`Parser::snapshot`] captures both halves of the state (cursor position
//! and builder checkpoint) so a failed attempt can be undone in one step.
//! Snapshots are `Copy` and a few words wide.

use tracing::{debug, trace};

use crate::cursor::{Cursor, Mark};
use crate::error::ParseError;
use crate::options::ParseOptions;
use crate::outcome::MatchOutcome;
use crate::rule::Rule;
use crate::stack::ensure_sufficient_stack;
use crate::tree::{Ast, AstBuilder, NodeId, TreeMark};

/// Message of the fatal error raised when nesting exceeds the limit.
pub const TOO_DEEP: &str = "nesting too deep";

/// Message of the error returned when the entry rule does not match.
pub const NO_MATCH: &str = "input did not match the grammar";

/// Cursor and tree builder state restored after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    mark: Mark,
    tree: TreeMark,
}

impl Snapshot {
    /// Cursor position at the time of the snapshot.
    #[inline]
    pub fn position(&self) -> u32 {
        self.mark.position()
    }
}

/// Mutable state of one parse.
pub struct Parser<'src> {
    cursor: Cursor<'src>,
    tree: AstBuilder,
    depth: usize,
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    /// Create a parser at the start of `source` with default options.
    pub fn new(source: &'src str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Create a parser at the start of `source`.
    pub fn with_options(source: &'src str, options: ParseOptions) -> Self {
        Parser {
            cursor: Cursor::new(source),
            tree: AstBuilder::new(),
            depth: 0,
            options,
        }
    }

    // === State Access ===

    #[inline]
    pub fn cursor(&self) -> &Cursor<'src> {
        &self.cursor
    }

    #[inline]
    pub fn cursor_mut(&mut self) -> &mut Cursor<'src> {
        &mut self.cursor
    }

    #[inline]
    pub fn tree(&self) -> &AstBuilder {
        &self.tree
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.cursor.position()
    }

    /// Current lazy-rule nesting depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    // === Snapshots ===

    /// Capture cursor and tree state.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mark: self.cursor.save(),
            tree: self.tree.checkpoint(),
        }
    }

    /// Undo everything since `snapshot`.
    #[inline]
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.cursor.restore(snapshot.mark);
        self.tree.rollback(snapshot.tree);
    }

    // === Tree Building ===

    /// Open a node starting at the current position.
    #[inline]
    pub fn open_node(&mut self, label: &'static str) -> NodeId {
        let start = self.cursor.position();
        self.tree.open_node(label, start)
    }

    /// Commit the current node, ending at the current position.
    #[inline]
    pub fn commit_node(&mut self) {
        let end = self.cursor.position();
        self.tree.commit_node(end);
    }

    /// Discard the current node and its subtree.
    #[inline]
    pub fn discard_node(&mut self) {
        self.tree.discard_node();
    }

    // === Errors and Recursion ===

    /// A fatal error at the current position.
    #[cold]
    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::here(&self.cursor, message)
    }

    /// Run `f` one nesting level deeper, on a guarded stack.
    ///
    /// Exceeding [`ParseOptions::max_depth`] is a fatal failure at the
    /// current position.
    pub fn descend(&mut self, f: impl FnOnce(&mut Self) -> MatchOutcome) -> MatchOutcome {
        if self.depth >= self.options.max_depth {
            trace!(depth = self.depth, position = self.position(), "nesting limit reached");
            return MatchOutcome::fatal(self.error_here(TOO_DEEP));
        }
        self.depth += 1;
        let ParseOptions {
            stack_red_zone,
            stack_growth,
            ..
        } = self.options;
        let outcome = ensure_sufficient_stack(stack_red_zone, stack_growth, || f(self));
        self.depth -= 1;
        outcome
    }

    /// Commit the root node at the current position.
    pub fn finish(self) -> Ast {
        let end = self.cursor.position();
        self.tree.finish(end)
    }
}

/// Parse `source` with `rule` as the entry point.
///
/// On success the root node (label `"ast"`) spans the consumed input and
/// has one child per top-level construct the rule labeled. The rule does
/// not have to consume all input; grammars that require it end with a
/// committed [`end_of_input`](crate::end_of_input).
pub fn parse(source: &str, rule: &Rule) -> Result<Ast, ParseError> {
    parse_with_options(source, rule, &ParseOptions::default())
}

/// [`parse`] with explicit limits.
pub fn parse_with_options(
    source: &str,
    rule: &Rule,
    options: &ParseOptions,
) -> Result<Ast, ParseError> {
    if u32::try_from(source.len()).is_err() {
        return Err(ParseError::unlocated(format!(
            "source too large ({} bytes)",
            source.len()
        )));
    }
    debug!(bytes = source.len(), "parse started");

    let mut parser = Parser::with_options(source, *options);
    match rule.matches(&mut parser) {
        MatchOutcome::Matched => {
            let ast = parser.finish();
            debug!(nodes = ast.node_count(), "parse finished");
            Ok(ast)
        }
        MatchOutcome::Backtrack => {
            debug!("entry rule did not match");
            Err(parser.error_here(NO_MATCH))
        }
        MatchOutcome::Fatal(error) => {
            debug!(
                position = error.position,
                message = %error.message,
                "parse failed"
            );
            Err(error)
        }
    }
}
