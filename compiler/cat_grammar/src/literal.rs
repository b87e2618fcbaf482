//! Number, string and character literals.
//!
//! Number alternatives are tried in a fixed order: `0x` hex, `0b` binary,
//! float, then int. The int rule refuses a trailing `.`, so `3.14` can only
//! be read as a float.

use cat_peg::{
    any_char, ast_node, choice, literal, no_fail, not, not_char, opt, plus, sequence, star, Rule,
};

use crate::lexical::{binary_digit, digit, hex_digit};

fn sign() -> Rule {
    opt(literal("-"))
}

/// `-?[0-9]+` not followed by `.`.
pub fn int() -> Rule {
    ast_node("int", sequence([sign(), plus(digit()), not(literal("."))]))
}

/// `-?[0-9]+.[0-9]+`.
pub fn float() -> Rule {
    ast_node(
        "float",
        sequence([sign(), plus(digit()), literal("."), plus(digit())]),
    )
}

pub fn hex() -> Rule {
    sequence([
        literal("0x"),
        no_fail(
            ast_node("hex", plus(hex_digit())),
            "expected at least one hexadecimal digit",
        ),
    ])
}

pub fn bin() -> Rule {
    sequence([
        literal("0b"),
        no_fail(
            ast_node("bin", plus(binary_digit())),
            "expected at least one binary digit",
        ),
    ])
}

pub fn number() -> Rule {
    choice([hex(), bin(), float(), int()])
}

/// A backslash escape or any character other than `"`.
fn string_char() -> Rule {
    choice([sequence([literal("\\"), any_char()]), not_char('"')])
}

pub fn string() -> Rule {
    ast_node(
        "string",
        sequence([literal("\""), star(string_char()), literal("\"")]),
    )
}

pub fn character() -> Rule {
    ast_node("char", sequence([literal("'"), string_char(), literal("'")]))
}

/// Any literal value.
pub fn any_literal() -> Rule {
    choice([string(), character(), number()])
}
