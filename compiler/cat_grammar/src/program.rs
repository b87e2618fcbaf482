//! Expressions, function definitions and the top-level entry rules.

use cat_peg::{
    ast_node, char_set, choice, delay_ref, end_of_input, literal, no_fail, opt, plus, sequence,
    star, Rule, RuleCell,
};

use crate::lexical::{ident, ident_next, token, token_str, word, ws};
use crate::literal::any_literal;
use crate::macros::macro_def;
use crate::types::type_decl;

static EXPR: RuleCell = RuleCell::new(build_expr);

/// Operator characters allowed in Cat names besides identifier characters.
pub const OPERATOR_CHARS: &str = "~`!@#$%^&*-+=|\\:;<>.?/";

pub fn cat_ident() -> Rule {
    plus(choice([ident_next(), char_set(OPERATOR_CHARS)]))
}

/// `()` as one symbol, or a single `(`, `)` or `,`.
pub fn symbol() -> Rule {
    choice([literal("()"), char_set("(),")])
}

pub fn name() -> Rule {
    token(ast_node("name", choice([symbol(), cat_ident()])))
}

/// `[ expr* ]`, a quoted program.
pub fn quote() -> Rule {
    ast_node(
        "quote",
        sequence([
            token_str("["),
            star(delay_ref(&EXPR)),
            no_fail(token_str("]"), "missing ']'"),
        ]),
    )
}

pub fn expr() -> Rule {
    EXPR.get().clone()
}

fn build_expr() -> Rule {
    token(choice([any_literal(), quote(), name()]))
}

pub fn code_block() -> Rule {
    sequence([
        token_str("{"),
        star(expr()),
        no_fail(token_str("}"), "missing '}'"),
    ])
}

pub fn param() -> Rule {
    token(ast_node("param", ident()))
}

pub fn params() -> Rule {
    sequence([
        token_str("("),
        star(param()),
        no_fail(token_str(")"), "missing ')'"),
    ])
}

/// `define name (params)? (: type)? { body }`.
pub fn fxn_def() -> Rule {
    ast_node(
        "def",
        sequence([
            word("define"),
            no_fail(name(), "expected name"),
            opt(params()),
            opt(type_decl()),
            no_fail(code_block(), "expected a code block"),
        ]),
    )
}

// === Entry Rules ===

/// Leading whitespace, then any mix of definitions, macros and
/// expressions. Stops at the first thing it cannot read.
pub fn line() -> Rule {
    sequence([ws(), star(choice([fxn_def(), macro_def(), expr()]))])
}

/// Function definitions only, with no macros or loose expressions.
pub fn plain_program() -> Rule {
    sequence([ws(), star(token(fxn_def()))])
}

/// Definitions and macros only.
pub fn definitions() -> Rule {
    sequence([
        ws(),
        star(choice([token(fxn_def()), token(macro_def())])),
    ])
}

/// A [`line`] that must consume the whole input.
pub fn program() -> Rule {
    sequence([line(), no_fail(end_of_input(), "unexpected input")])
}
