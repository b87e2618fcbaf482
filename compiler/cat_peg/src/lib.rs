//! Backtracking PEG engine with an incremental syntax-tree builder.
//!
//! Grammars are written as values: leaf matchers ([`literal`],
//! [`char_set`], [`any_char`], ...) composed with [`sequence`], [`choice`],
//! repetition and lookahead. Two combinators give a grammar its shape:
//!
//! - [`ast_node`] labels whatever its inner rule matches. Labeled nodes
//!   nest to form the tree returned by [`parse`].
//! - [`no_fail`] marks a commit point. Past it, a failure is a
//!   [`ParseError`] instead of a silent backtrack, so the error points at
//!   the real problem rather than at the start of the enclosing construct.
//!
//! Recursive grammars refer to themselves through [`delay_ref`] and a
//! `static` [`RuleCell`], and a set of named rules can be collected into a
//! [`Grammar`].
//!
//! ```
//! use cat_peg::{ast_node, char_range, literal, no_fail, plus, sequence};
//!
//! let digits = ast_node("int", plus(char_range('0', '9')));
//! let list = ast_node(
//!     "list",
//!     sequence([literal("("), digits, no_fail(literal(")"), "missing ')'")]),
//! );
//!
//! let ast = cat_peg::parse("(42)", &list).unwrap();
//! assert_eq!(ast.child_labels(ast.root()), ["list"]);
//!
//! let err = cat_peg::parse("(42", &list).unwrap_err();
//! assert_eq!(err.message, "missing ')'");
//! assert_eq!(err.position, 3);
//! ```
//!
//! # Modules
//!
//! - [`cursor`]: position tracking over the source text
//! - [`tree`]: node arena and the builder used while matching
//! - [`rule`]: rule values and combinator constructors
//! - [`parser`]: per-parse state and the parse driver
//! - [`grammar`]: named rule tables
//! - [`error`] / [`diagnostic`]: failure reporting

pub mod cursor;
pub mod diagnostic;
pub mod error;
pub mod grammar;
pub mod options;
pub mod outcome;
pub mod parser;
pub mod rule;
pub mod span;
pub mod tree;

mod stack;

pub use cursor::{Cursor, EndOfInput, Mark};
pub use diagnostic::Diagnostic;
pub use error::{GrammarError, GrammarParseError, ParseError};
pub use grammar::{Grammar, GrammarBuilder};
pub use options::ParseOptions;
pub use outcome::MatchOutcome;
pub use parser::{parse, parse_with_options, Parser, Snapshot};
pub use rule::{
    any_char, ast_node, char_class, char_range, char_set, choice, delay, delay_ref, end_of_input,
    literal, no_fail, not, not_char, opt, plus, sequence, star, CharClass, Rule, RuleCell,
};
pub use span::Span;
pub use tree::{Ast, AstBuilder, Node, NodeId, ROOT_LABEL};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set, so it is safe to call from tests
/// and binaries alike. Only the first call has any effect.
///
/// ```bash
/// RUST_LOG=cat_peg=debug cargo test
/// RUST_LOG=cat_peg::rule=trace cargo test   # commit points and lookahead
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
