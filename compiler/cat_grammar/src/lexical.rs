//! Character classes, whitespace and tokens.
//!
//! Whitespace includes `//` line comments and `/* */` block comments. Every
//! token rule swallows the whitespace after it, so grammar rules only need
//! to skip leading whitespace once, at the start of a line.

use cat_peg::{
    any_char, char_class, char_set, choice, literal, no_fail, not, not_char, sequence, star, Rule,
};

// === Character Classes ===

pub fn digit() -> Rule {
    char_class("digit", |c| c.is_ascii_digit())
}

pub fn hex_digit() -> Rule {
    char_class("hex_digit", |c| c.is_ascii_hexdigit())
}

pub fn binary_digit() -> Rule {
    char_set("01")
}

pub fn lower() -> Rule {
    char_class("lower", char::is_lowercase)
}

pub fn upper() -> Rule {
    char_class("upper", char::is_uppercase)
}

/// A character that may continue an identifier: letter, digit or `_`.
pub fn ident_next() -> Rule {
    char_class("ident_next", |c| c.is_alphanumeric() || c == '_')
}

/// A letter or `_` followed by any number of [`ident_next`] characters.
pub fn ident() -> Rule {
    sequence([
        char_class("ident_first", |c| c.is_alphabetic() || c == '_'),
        star(ident_next()),
    ])
}

/// End of word: the next character cannot continue an identifier.
pub fn eow() -> Rule {
    not(ident_next())
}

// === Whitespace ===

pub fn line_comment() -> Rule {
    sequence([literal("//"), star(not_char('\n'))])
}

pub fn block_comment() -> Rule {
    sequence([
        literal("/*"),
        star(sequence([not(literal("*/")), any_char()])),
        no_fail(literal("*/"), "missing '*/'"),
    ])
}

/// Zero or more whitespace characters and comments.
pub fn ws() -> Rule {
    star(choice([
        char_class("space", char::is_whitespace),
        line_comment(),
        block_comment(),
    ]))
}

// === Tokens ===

/// `rule` followed by optional whitespace.
pub fn token(rule: Rule) -> Rule {
    sequence([rule, ws()])
}

/// The exact text `text` followed by optional whitespace.
pub fn token_str(text: &str) -> Rule {
    token(literal(text))
}

/// A keyword: `text` not followed by an identifier character.
pub fn word(text: &str) -> Rule {
    sequence([literal(text), eow(), ws()])
}
