//! Function type declarations.
//!
//! ```text
//! define swap : ('a 'b -> 'b 'a) { swap }
//! ```
//!
//! A function type is a production stack, an arrow (`->` pure, `~>`
//! impure) and a consumption stack. Stack components are type names,
//! `'`-prefixed type variables (lowercase) or stack variables (uppercase),
//! named aliases `x=component`, and nested function types.

use cat_peg::{ast_node, choice, delay_ref, literal, no_fail, sequence, star, Rule, RuleCell};

use crate::lexical::{ident, ident_next, lower, token, token_str, upper, ws};

static TYPE_COMPONENT: RuleCell = RuleCell::new(build_type_component);
static FXN_TYPE: RuleCell = RuleCell::new(build_fxn_type);

pub fn type_var() -> Rule {
    ast_node("type_var", sequence([lower(), star(ident_next())]))
}

pub fn stack_var() -> Rule {
    ast_node("stack_var", sequence([upper(), star(ident_next())]))
}

pub fn type_or_stack_var() -> Rule {
    sequence([
        literal("'"),
        no_fail(
            choice([type_var(), stack_var()]),
            "invalid type or stack variable name",
        ),
        ws(),
    ])
}

pub fn type_name() -> Rule {
    token(ast_node("type_name", ident()))
}

pub fn type_alias() -> Rule {
    token(sequence([ident(), token_str("="), delay_ref(&TYPE_COMPONENT)]))
}

pub fn type_component() -> Rule {
    TYPE_COMPONENT.get().clone()
}

fn build_type_component() -> Rule {
    choice([
        type_alias(),
        type_name(),
        type_or_stack_var(),
        delay_ref(&FXN_TYPE),
    ])
}

/// Zero or more components, as one `stack` node.
pub fn stack() -> Rule {
    ast_node("stack", token(star(type_component())))
}

pub fn arrow() -> Rule {
    ast_node("arrow", choice([token_str("->"), token_str("~>")]))
}

pub fn fxn_type() -> Rule {
    FXN_TYPE.get().clone()
}

fn build_fxn_type() -> Rule {
    ast_node(
        "type_fxn",
        sequence([
            token_str("("),
            stack(),
            no_fail(arrow(), "expected either -> or ~>"),
            stack(),
            no_fail(token_str(")"), "expected closing parenthesis"),
        ]),
    )
}

/// `: (…)` after a function name.
pub fn type_decl() -> Rule {
    sequence([
        token_str(":"),
        no_fail(fxn_type(), "expected function type declaration"),
        ws(),
    ])
}

#[cfg(test)]
mod tests;
