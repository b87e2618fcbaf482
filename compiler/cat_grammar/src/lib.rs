//! Grammar for the Cat stack language, written with `cat_peg` combinators.
//!
//! Cat programs are sequences of literals, names and `[...]` quotations,
//! optionally interleaved with function definitions and macros:
//!
//! ```text
//! define twice : ('A ('A -> 'A) -> 'A) { dup [apply] dip apply }
//! macro { $a $b swap } => { $b $a }
//! 1 [ 2 + ] twice
//! ```
//!
//! [`grammar`] returns the process-wide rule table; [`parse`] reads a whole
//! program from its `program` entry rule. The rule builders are public so
//! tests and tools can match fragments directly.

pub mod lexical;
pub mod literal;
pub mod macros;
pub mod program;
pub mod types;

use std::sync::OnceLock;

use cat_peg::{Ast, Grammar, GrammarParseError, ParseError, ParseOptions};
use tracing::debug;

/// Name of the entry rule used by [`parse`].
pub const ENTRY: &str = "program";

static GRAMMAR: OnceLock<Grammar> = OnceLock::new();

/// The Cat rule table, built on first use.
pub fn grammar() -> &'static Grammar {
    GRAMMAR.get_or_init(build)
}

fn build() -> Grammar {
    let grammar = Grammar::builder(ENTRY)
        .define("ws", lexical::ws())
        .define("ident", lexical::ident())
        .define("int", literal::int())
        .define("float", literal::float())
        .define("hex", literal::hex())
        .define("bin", literal::bin())
        .define("number", literal::number())
        .define("string", literal::string())
        .define("char", literal::character())
        .define("literal", literal::any_literal())
        .define("name", program::name())
        .define("quote", program::quote())
        .define("expr", program::expr())
        .define("code_block", program::code_block())
        .define("params", program::params())
        .define("def", program::fxn_def())
        .define("type_fxn", types::fxn_type())
        .define("type_decl", types::type_decl())
        .define("macro", macros::macro_def())
        .define("macro_pattern", macros::macro_pattern())
        .define("line", program::line())
        .define("plain_program", program::plain_program())
        .define("definitions", program::definitions())
        .define(ENTRY, program::program())
        .build()
        .unwrap_or_else(|error| panic!("cat rule table is malformed: {error}"));
    debug!(rules = grammar.len(), "cat grammar built");
    grammar
}

/// Parse a complete Cat program.
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    grammar().parse(source)
}

/// Parse a complete Cat program with explicit limits.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Result<Ast, ParseError> {
    grammar().parse_with_options(source, options)
}

/// Parse `source` starting from the rule called `name`.
pub fn parse_rule(name: &str, source: &str) -> Result<Ast, GrammarParseError> {
    grammar().parse_rule(name, source)
}
