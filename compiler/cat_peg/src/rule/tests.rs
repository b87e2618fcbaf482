#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::options::ParseOptions;
use crate::tree::NodeId;
use pretty_assertions::assert_eq;

/// Match `rule` against `source` and report the outcome and final position.
fn run(rule: &Rule, source: &str) -> (MatchOutcome, u32) {
    crate::init_tracing();
    let mut p = Parser::new(source);
    let outcome = rule.matches(&mut p);
    (outcome, p.position())
}

fn digit() -> Rule {
    char_class("digit", |c| c.is_ascii_digit())
}

// === Leaf Rules ===

#[test]
fn literal_matches_exact_text() {
    assert_eq!(run(&literal("define"), "define f"), (MatchOutcome::Matched, 6));
    assert_eq!(run(&literal("define"), "defin"), (MatchOutcome::Backtrack, 0));
    assert_eq!(run(&literal(""), "x"), (MatchOutcome::Matched, 0));
}

#[test]
fn char_set_and_range() {
    assert_eq!(run(&char_set("+-"), "-1"), (MatchOutcome::Matched, 1));
    assert_eq!(run(&char_set("+-"), "1"), (MatchOutcome::Backtrack, 0));
    assert_eq!(run(&char_range('a', 'f'), "f"), (MatchOutcome::Matched, 1));
    assert_eq!(run(&char_range('a', 'f'), "g"), (MatchOutcome::Backtrack, 0));
}

#[test]
fn char_class_uses_predicate() {
    assert_eq!(run(&digit(), "7"), (MatchOutcome::Matched, 1));
    assert_eq!(run(&digit(), "x"), (MatchOutcome::Backtrack, 0));
    assert_eq!(run(&digit(), ""), (MatchOutcome::Backtrack, 0));
}

#[test]
fn not_char_excludes_one_character() {
    assert_eq!(run(&not_char('"'), "a"), (MatchOutcome::Matched, 1));
    assert_eq!(run(&not_char('"'), "\""), (MatchOutcome::Backtrack, 0));
    assert_eq!(run(&not_char('"'), ""), (MatchOutcome::Backtrack, 0));
}

#[test]
fn any_char_consumes_whole_character() {
    assert_eq!(run(&any_char(), "é"), (MatchOutcome::Matched, 2));
    assert_eq!(run(&any_char(), ""), (MatchOutcome::Backtrack, 0));
}

#[test]
fn end_of_input_consumes_nothing() {
    assert_eq!(run(&end_of_input(), ""), (MatchOutcome::Matched, 0));
    assert_eq!(run(&end_of_input(), "a"), (MatchOutcome::Backtrack, 0));
}

// === Sequence / Choice ===

#[test]
fn sequence_restores_on_partial_match() {
    let rule = sequence([literal("a"), literal("b"), literal("c")]);
    assert_eq!(run(&rule, "abc"), (MatchOutcome::Matched, 3));
    assert_eq!(run(&rule, "abx"), (MatchOutcome::Backtrack, 0));
}

#[test]
fn choice_takes_first_match_in_order() {
    // PEG choice is ordered: the shorter alternative wins when listed first.
    let rule = choice([literal("a"), literal("ab")]);
    assert_eq!(run(&rule, "ab"), (MatchOutcome::Matched, 1));

    let rule = choice([literal("ab"), literal("a")]);
    assert_eq!(run(&rule, "ab"), (MatchOutcome::Matched, 2));
    assert_eq!(run(&rule, "x"), (MatchOutcome::Backtrack, 0));
}

#[test]
fn empty_sequence_matches_and_empty_choice_fails() {
    assert_eq!(run(&sequence([]), "x"), (MatchOutcome::Matched, 0));
    assert_eq!(run(&choice([]), "x"), (MatchOutcome::Backtrack, 0));
}

// === Repetition ===

#[test]
fn star_matches_greedily() {
    assert_eq!(run(&star(literal("a")), "aaab"), (MatchOutcome::Matched, 3));
    assert_eq!(run(&star(literal("a")), "b"), (MatchOutcome::Matched, 0));
}

#[test]
fn star_stops_on_empty_iteration() {
    let rule = star(opt(literal("a")));
    assert_eq!(run(&rule, "aab"), (MatchOutcome::Matched, 2));
    assert_eq!(run(&rule, "b"), (MatchOutcome::Matched, 0));
}

#[test]
fn plus_requires_one_match() {
    assert_eq!(run(&plus(digit()), "123x"), (MatchOutcome::Matched, 3));
    assert_eq!(run(&plus(digit()), "x"), (MatchOutcome::Backtrack, 0));
}

#[test]
fn opt_always_matches() {
    assert_eq!(run(&opt(literal("-")), "-1"), (MatchOutcome::Matched, 1));
    assert_eq!(run(&opt(literal("-")), "1"), (MatchOutcome::Matched, 0));
}

// === Lookahead ===

#[test]
fn not_never_consumes() {
    assert_eq!(run(&not(literal("a")), "b"), (MatchOutcome::Matched, 0));
    assert_eq!(run(&not(literal("a")), "a"), (MatchOutcome::Backtrack, 0));
}

#[test]
fn not_swallows_fatal_failure() {
    let rule = not(sequence([literal("x"), no_fail(literal("y"), "boom")]));
    assert_eq!(run(&rule, "xz"), (MatchOutcome::Matched, 0));
}

#[test]
fn not_discards_nodes_from_inner_match() {
    let rule = sequence([not(ast_node("a", literal("a"))), any_char()]);
    let mut p = Parser::new("b");
    assert!(rule.matches(&mut p).is_matched());
    assert_eq!(p.tree().node_count(), 1);
}

// === Commit Points ===

#[test]
fn no_fail_converts_backtrack_to_fatal() {
    let rule = sequence([literal("["), no_fail(literal("]"), "missing ']'")]);
    let (outcome, _) = run(&rule, "[ 1");
    let error = outcome.fatal_error().cloned();
    assert_eq!(error.as_ref().map(|e| e.message.as_str()), Some("missing ']'"));
    assert_eq!(error.map(|e| e.position), Some(1));
}

#[test]
fn fatal_stops_enclosing_choice() {
    let rule = choice([
        sequence([literal("["), no_fail(literal("]"), "missing ']'")]),
        literal("[x"),
    ]);
    assert!(run(&rule, "[x").0.is_fatal());
}

#[test]
fn fatal_stops_repetition() {
    let item = sequence([literal("("), no_fail(literal(")"), "missing ')'")]);
    let (outcome, _) = run(&star(item), "()()(");
    assert_eq!(
        outcome.fatal_error().map(|e| e.position),
        Some(5),
    );
}

#[test]
fn no_fail_passes_matches_through() {
    assert_eq!(
        run(&no_fail(literal("a"), "missing a"), "a"),
        (MatchOutcome::Matched, 1)
    );
}

// === Tree Building ===

#[test]
fn ast_node_spans_inner_match() {
    let rule = ast_node("int", plus(digit()));
    let ast = rule.parse("42").unwrap();
    let int = ast.children(ast.root())[0];
    assert_eq!(ast.get(int).label(), "int");
    assert_eq!(ast.get(int).span(), crate::Span::new(0, 2));
}

#[test]
fn failed_alternative_leaves_no_nodes() {
    let rule = choice([
        sequence([ast_node("a", literal("a")), literal("b")]),
        ast_node("ac", literal("ac")),
    ]);
    let ast = rule.parse("ac").unwrap();
    assert_eq!(ast.child_labels(ast.root()), vec!["ac"]);
    assert_eq!(ast.node_count(), 2);
}

#[test]
fn failed_repetition_leaves_no_partial_node() {
    let pair = ast_node("pair", sequence([digit(), digit()]));
    let rule = star(pair);
    let ast = rule.parse("12345").unwrap();
    assert_eq!(ast.child_labels(ast.root()), vec!["pair", "pair"]);
    assert_eq!(ast.root_node().span(), crate::Span::new(0, 4));
}

#[test]
fn fatal_inside_node_restores_builder() {
    let rule = ast_node(
        "list",
        sequence([
            literal("("),
            ast_node("int", digit()),
            no_fail(literal(")"), "missing ')'"),
        ]),
    );
    let mut p = Parser::new("(1");
    assert!(rule.matches(&mut p).is_fatal());
    assert_eq!(p.tree().current(), NodeId::ROOT);
    assert!(!p.tree().has_open_node());
    assert_eq!(p.tree().node_count(), 1);
}

// === Lazy References ===

fn paren() -> Rule {
    ast_node(
        "paren",
        sequence([literal("("), delay(inner), no_fail(literal(")"), "missing ')'")]),
    )
}

fn inner() -> Rule {
    choice([delay(paren), ast_node("x", literal("x"))])
}

#[test]
fn delay_supports_recursion() {
    let ast = delay(paren).parse("((x))").unwrap();
    let outer = ast.children(ast.root())[0];
    assert_eq!(ast.depth(outer), 3);
    let labels: Vec<_> = ast
        .descendants(outer)
        .map(|id| ast.get(id).label())
        .collect();
    assert_eq!(labels, vec!["paren", "paren", "x"]);
}

static BUILDS: AtomicUsize = AtomicUsize::new(0);

fn counted() -> Rule {
    BUILDS.fetch_add(1, Ordering::SeqCst);
    literal("a")
}

#[test]
fn delay_builds_once() {
    let rule = delay(counted);
    let copy = rule.clone();
    assert!(rule.parse("a").is_ok());
    assert!(copy.parse("a").is_ok());
    assert!(rule.parse("b").is_err());
    assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
}

static SHARED_BUILDS: AtomicUsize = AtomicUsize::new(0);

static SHARED_PAREN: RuleCell = RuleCell::new(|| {
    SHARED_BUILDS.fetch_add(1, Ordering::SeqCst);
    ast_node(
        "paren",
        sequence([
            literal("("),
            delay_ref(&SHARED_INNER),
            no_fail(literal(")"), "missing ')'"),
        ]),
    )
});

static SHARED_INNER: RuleCell = RuleCell::new(|| {
    SHARED_BUILDS.fetch_add(1, Ordering::SeqCst);
    choice([delay_ref(&SHARED_PAREN), ast_node("x", literal("x"))])
});

#[test]
fn delay_ref_builds_each_cell_once_at_any_depth() {
    for n in [10, 100, 1_000] {
        let source = format!("{}x{}", "(".repeat(n), ")".repeat(n));
        let ast = crate::parse(&source, SHARED_PAREN.get()).unwrap();
        assert_eq!(ast.node_count(), n + 2);
        assert_eq!(SHARED_BUILDS.load(Ordering::SeqCst), 2);
    }
    let err = crate::parse("((x)", SHARED_PAREN.get()).unwrap_err();
    assert_eq!(err.message, "missing ')'");
    assert_eq!(SHARED_BUILDS.load(Ordering::SeqCst), 2);
}

#[test]
fn delay_ref_resolves_to_the_cell_rule() {
    let rule = delay_ref(&SHARED_INNER);
    assert_eq!(run(&rule, "(x)"), (MatchOutcome::Matched, 3));
    assert_eq!(run(&rule, "y"), (MatchOutcome::Backtrack, 0));
    assert_eq!(rule.to_string(), "<delay>");
}

#[test]
fn nesting_limit_is_fatal() {
    let options = ParseOptions::default().with_max_depth(3);
    let err = crate::parse_with_options("(((x)))", &delay(paren), &options).unwrap_err();
    assert_eq!(err.message, "nesting too deep");
    assert_eq!(err.position, 2);
}

#[test]
fn deep_nesting_within_limit() {
    let n = 2_000;
    let source = format!("{}x{}", "(".repeat(n), ")".repeat(n));
    let ast = delay(paren).parse(&source).unwrap();
    assert_eq!(ast.node_count(), n + 2);
}

// === Display ===

#[test]
fn display_uses_peg_notation() {
    let rule = sequence([literal("a"), star(char_range('0', '9'))]);
    assert_eq!(rule.to_string(), "(\"a\" [0-9]*)");
    assert_eq!(choice([literal("a"), literal("b")]).to_string(), "(\"a\" / \"b\")");
    assert_eq!(not(any_char()).to_string(), "!.");
    assert_eq!(ast_node("int", plus(digit())).to_string(), "int:<digit>+");
    assert_eq!(char_set("+-").to_string(), "[+-]");
    assert_eq!(not_char('"').to_string(), "[^\\\"]");
    assert_eq!(delay(paren).to_string(), "<delay>");
    assert_eq!(
        no_fail(literal(")"), "missing ')'").to_string(),
        "\")\"^\"missing ')'\""
    );
    assert_eq!(format!("{:?}", opt(literal("-"))), "Rule(\"-\"?)");
}

#[test]
fn rules_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Rule>();
}

#[test]
fn char_conversions_build_literals() {
    let rule: Rule = '('.into();
    assert_eq!(run(&rule, "("), (MatchOutcome::Matched, 1));
    let rule: Rule = "def".into();
    assert_eq!(run(&rule, "def"), (MatchOutcome::Matched, 3));
}
