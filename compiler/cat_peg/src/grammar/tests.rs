#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::rule::{ast_node, char_range, delay, literal, plus, sequence, star};
use pretty_assertions::assert_eq;

fn number() -> Rule {
    ast_node("int", plus(char_range('0', '9')))
}

fn sample() -> Grammar {
    Grammar::builder("list")
        .define("int", number())
        .define(
            "list",
            star(sequence([delay(number), star(literal(" "))])),
        )
        .build()
        .unwrap()
}

#[test]
fn build_rejects_duplicate_names() {
    let err = Grammar::builder("int")
        .define("int", number())
        .define("int", literal("0"))
        .build()
        .unwrap_err();
    assert_eq!(err, GrammarError::DuplicateRule("int"));
}

#[test]
fn build_rejects_missing_entry() {
    let err = Grammar::builder("program")
        .define("int", number())
        .build()
        .unwrap_err();
    assert_eq!(err, GrammarError::UnknownEntry("program"));
}

#[test]
fn lookup_by_name() {
    let grammar = sample();
    assert_eq!(grammar.entry_name(), "list");
    assert_eq!(grammar.names(), vec!["int", "list"]);
    assert_eq!(grammar.len(), 2);
    assert!(!grammar.is_empty());
    assert!(grammar.rule("int").is_ok());
    assert_eq!(
        grammar.rule("float").unwrap_err(),
        GrammarError::UnknownRule("float".to_owned())
    );
}

#[test]
fn parse_uses_entry_rule() {
    let grammar = sample();
    let ast = grammar.parse("1 22 333").unwrap();
    assert_eq!(ast.child_labels(ast.root()), vec!["int", "int", "int"]);
}

#[test]
fn parse_rule_starts_from_named_rule() {
    let grammar = sample();
    let ast = grammar.parse_rule("int", "7").unwrap();
    assert_eq!(ast.child_labels(ast.root()), vec!["int"]);

    let err = grammar.parse_rule("nope", "7").unwrap_err();
    assert!(matches!(err, GrammarParseError::Grammar(GrammarError::UnknownRule(_))));

    let err = grammar.parse_rule("int", "x").unwrap_err();
    assert!(matches!(err, GrammarParseError::Parse(_)));
}

#[test]
fn grammar_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Grammar>();
}
