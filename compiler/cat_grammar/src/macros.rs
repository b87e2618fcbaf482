//! Macro definitions: `macro { pattern } => { pattern }`.
//!
//! Pattern terms are names, nested `[...]` quotes, and `$`-prefixed
//! variables that bind a single value (`$a`, lowercase) or the rest of the
//! stack (`$A`, uppercase).

use cat_peg::{ast_node, choice, delay_ref, literal, no_fail, sequence, star, Rule, RuleCell};

use crate::lexical::{ident_next, lower, token, token_str, upper, word};
use crate::program::{cat_ident, symbol};

static MACRO_TERM: RuleCell = RuleCell::new(build_macro_term);

pub fn macro_type_var() -> Rule {
    ast_node("macro_type_var", sequence([lower(), star(ident_next())]))
}

pub fn macro_stack_var() -> Rule {
    ast_node("macro_stack_var", sequence([upper(), star(ident_next())]))
}

pub fn macro_var() -> Rule {
    sequence([
        literal("$"),
        no_fail(
            choice([macro_type_var(), macro_stack_var()]),
            "expected a valid macro type variable or stack variable",
        ),
    ])
}

pub fn macro_name() -> Rule {
    ast_node("macro_name", choice([symbol(), cat_ident()]))
}

pub fn macro_term() -> Rule {
    MACRO_TERM.get().clone()
}

fn build_macro_term() -> Rule {
    token(choice([macro_quote(), macro_var(), macro_name()]))
}

pub fn macro_quote() -> Rule {
    ast_node(
        "macro_quote",
        sequence([
            token_str("["),
            star(delay_ref(&MACRO_TERM)),
            no_fail(token_str("]"), "missing ']'"),
        ]),
    )
}

pub fn macro_pattern() -> Rule {
    ast_node(
        "macro_pattern",
        sequence([
            token_str("{"),
            star(macro_term()),
            no_fail(token_str("}"), "missing '}'"),
        ]),
    )
}

pub fn macro_def() -> Rule {
    ast_node(
        "macro",
        sequence([
            word("macro"),
            no_fail(
                sequence([macro_pattern(), token_str("=>"), macro_pattern()]),
                "expected macro definition",
            ),
        ]),
    )
}
