//! Rule values and the combinators that build them.
//!
//! A [`Rule`] is an immutable, cheaply cloneable description of a pattern.
//! Rules form a DAG through shared `Arc`s; recursion goes through a lazy
//! reference that names a rule instead of holding it.
//!
//! # Lazy References
//!
//! - [`delay_ref`] points at a `static` [`RuleCell`]. The cell builds its
//!   rule once per process and every reference to it shares that rule, so
//!   recursive grammars stay a fixed size no matter how deep the input
//!   nests. Use this for rules that refer to themselves.
//! - [`delay`] takes a constructor function and caches its result in the
//!   reference itself. Each `delay` value builds its own copy, so a cycle
//!   made only of `delay`s grows by one copy per new nesting level reached.
//!
//! ```
//! use cat_peg::{ast_node, choice, delay_ref, literal, sequence, RuleCell};
//!
//! static PAREN: RuleCell = RuleCell::new(|| {
//!     ast_node("paren", sequence([literal("("), delay_ref(&INNER), literal(")")]))
//! });
//! static INNER: RuleCell = RuleCell::new(|| choice([delay_ref(&PAREN), literal("x")]));
//!
//! let ast = PAREN.get().parse("((x))").unwrap();
//! assert_eq!(ast.depth(ast.root()), 3);
//! ```
//!
//! # Matching
//!
//! Every rule upholds one contract: on [`MatchOutcome::Backtrack`] the
//! cursor and the tree builder are exactly as they were before the attempt.
//! Leaf rules never move on failure; `sequence` and `ast_node` restore a
//! [`Snapshot`](crate::parser::Snapshot) taken before they started. Every
//! rule also returns with the builder's current node unchanged, whatever
//! the outcome, so a fatal failure can be caught by `not` and the state
//! restored wholesale.
//!
//! # Combinator Reference
//!
//! | Constructor | PEG | Fatal policy |
//! |-------------|-----|--------------|
//! | [`literal`] | `"s"` | never |
//! | [`char_set`], [`char_range`], [`char_class`], [`not_char`] | `[…]` | never |
//! | [`any_char`] | `.` | never |
//! | [`end_of_input`] | `!.` | never |
//! | [`sequence`] | `a b` | propagates |
//! | [`choice`] | `a / b` | propagates |
//! | [`star`], [`plus`], [`opt`] | `a*`, `a+`, `a?` | propagates |
//! | [`not`] | `!a` | swallows |
//! | [`delay`], [`delay_ref`] | | propagates; raises "nesting too deep" |
//! | [`ast_node`] | | propagates |
//! | [`no_fail`] | | raises on backtrack |

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::trace;

use crate::cursor::EndOfInput;
use crate::outcome::MatchOutcome;
use crate::parser::Parser;

/// A compiled pattern. Cloning shares the underlying node.
#[derive(Clone)]
pub struct Rule(Arc<RuleKind>);

enum RuleKind {
    Literal(Box<str>),
    Class(CharClass),
    AnyChar,
    EndOfInput,
    Sequence(Box<[Rule]>),
    Choice(Box<[Rule]>),
    Star(Rule),
    Plus(Rule),
    Opt(Rule),
    Not(Rule),
    Delay(Delayed),
    AstNode { label: &'static str, rule: Rule },
    NoFail { rule: Rule, message: Box<str> },
}

/// A single-character predicate.
#[derive(Clone)]
pub enum CharClass {
    /// Any of the listed characters.
    Set(Box<[char]>),
    /// An inclusive range.
    Range(char, char),
    /// Any character except this one.
    Except(char),
    /// A named predicate such as "digit" or "whitespace".
    Named {
        name: &'static str,
        test: fn(char) -> bool,
    },
}

impl CharClass {
    /// Returns `true` if `ch` belongs to the class.
    pub fn contains(&self, ch: char) -> bool {
        match self {
            CharClass::Set(chars) => chars.contains(&ch),
            CharClass::Range(lo, hi) => (*lo..=*hi).contains(&ch),
            CharClass::Except(excluded) => ch != *excluded,
            CharClass::Named { test, .. } => test(ch),
        }
    }
}

/// A rule built on first use and shared by every reference to it.
///
/// Meant for `static` items. The build function must not call
/// [`RuleCell::get`] on the cell being built; refer to it with
/// [`delay_ref`] instead.
pub struct RuleCell {
    build: fn() -> Rule,
    rule: OnceLock<Rule>,
}

impl RuleCell {
    pub const fn new(build: fn() -> Rule) -> Self {
        RuleCell {
            build,
            rule: OnceLock::new(),
        }
    }

    /// The rule, building it if this is the first use.
    #[inline]
    pub fn get(&self) -> &Rule {
        self.rule.get_or_init(self.build)
    }
}

impl fmt::Debug for RuleCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCell")
            .field("built", &self.rule.get().is_some())
            .finish()
    }
}

enum Delayed {
    Owned(RuleCell),
    Shared(&'static RuleCell),
}

impl Delayed {
    #[inline]
    fn resolve(&self) -> &Rule {
        match self {
            Delayed::Owned(cell) => cell.get(),
            Delayed::Shared(cell) => cell.get(),
        }
    }
}

impl Rule {
    fn new(kind: RuleKind) -> Self {
        Rule(Arc::new(kind))
    }

    /// Attempt this rule at the parser's current position.
    pub fn matches(&self, p: &mut Parser<'_>) -> MatchOutcome {
        match &*self.0 {
            RuleKind::Literal(text) => MatchOutcome::from_bool(p.cursor_mut().eat(text)),
            RuleKind::Class(class) => match_char(p, |ch| class.contains(ch)),
            RuleKind::AnyChar => match_char(p, |_| true),
            RuleKind::EndOfInput => MatchOutcome::from_bool(p.cursor().at_end()),
            RuleKind::Sequence(rules) => match_sequence(rules, p),
            RuleKind::Choice(rules) => match_choice(rules, p),
            RuleKind::Star(rule) => match_repeat(rule, p),
            RuleKind::Plus(rule) => match rule.matches(p) {
                MatchOutcome::Matched => match_repeat(rule, p),
                other => other,
            },
            RuleKind::Opt(rule) => match rule.matches(p) {
                MatchOutcome::Backtrack => MatchOutcome::Matched,
                other => other,
            },
            RuleKind::Not(rule) => match_not(rule, p),
            RuleKind::Delay(delayed) => {
                let rule = delayed.resolve();
                p.descend(|p| rule.matches(p))
            }
            RuleKind::AstNode { label, rule } => match_node(*label, rule, p),
            RuleKind::NoFail { rule, message } => rule.matches(p).or_fatal(|| {
                let error = p.error_here(&**message);
                trace!(position = error.position, message = %error.message, "commit point failed");
                error
            }),
        }
    }

    /// Parse `source` with this rule as the entry point.
    pub fn parse(&self, source: &str) -> Result<crate::tree::Ast, crate::error::ParseError> {
        crate::parser::parse(source, self)
    }
}

fn match_char(p: &mut Parser<'_>, accept: impl Fn(char) -> bool) -> MatchOutcome {
    let mark = p.cursor().save();
    match p.cursor_mut().advance() {
        Ok(ch) if accept(ch) => MatchOutcome::Matched,
        Ok(_) => {
            p.cursor_mut().restore(mark);
            MatchOutcome::Backtrack
        }
        Err(EndOfInput { .. }) => MatchOutcome::Backtrack,
    }
}

fn match_sequence(rules: &[Rule], p: &mut Parser<'_>) -> MatchOutcome {
    let snapshot = p.snapshot();
    for rule in rules {
        match rule.matches(p) {
            MatchOutcome::Matched => {}
            MatchOutcome::Backtrack => {
                p.restore(snapshot);
                return MatchOutcome::Backtrack;
            }
            fatal @ MatchOutcome::Fatal(_) => return fatal,
        }
    }
    MatchOutcome::Matched
}

fn match_choice(rules: &[Rule], p: &mut Parser<'_>) -> MatchOutcome {
    for rule in rules {
        let snapshot = p.snapshot();
        match rule.matches(p) {
            MatchOutcome::Backtrack => p.restore(snapshot),
            other => return other,
        }
    }
    MatchOutcome::Backtrack
}

/// Zero or more matches. An iteration that matches without consuming
/// input ends the loop.
fn match_repeat(rule: &Rule, p: &mut Parser<'_>) -> MatchOutcome {
    loop {
        let snapshot = p.snapshot();
        match rule.matches(p) {
            MatchOutcome::Matched if p.position() == snapshot.position() => break,
            MatchOutcome::Matched => {}
            MatchOutcome::Backtrack => {
                p.restore(snapshot);
                break;
            }
            fatal @ MatchOutcome::Fatal(_) => return fatal,
        }
    }
    MatchOutcome::Matched
}

fn match_not(rule: &Rule, p: &mut Parser<'_>) -> MatchOutcome {
    let snapshot = p.snapshot();
    let outcome = rule.matches(p);
    if let Some(error) = outcome.fatal_error() {
        trace!(position = error.position, message = %error.message, "lookahead swallowed fatal failure");
    }
    p.restore(snapshot);
    outcome.negate()
}

fn match_node(label: &'static str, rule: &Rule, p: &mut Parser<'_>) -> MatchOutcome {
    let snapshot = p.snapshot();
    p.open_node(label);
    match rule.matches(p) {
        MatchOutcome::Matched => {
            p.commit_node();
            MatchOutcome::Matched
        }
        MatchOutcome::Backtrack => {
            p.discard_node();
            p.restore(snapshot);
            MatchOutcome::Backtrack
        }
        fatal @ MatchOutcome::Fatal(_) => {
            p.discard_node();
            fatal
        }
    }
}

// === Constructors ===

/// Match `text` exactly.
pub fn literal(text: &str) -> Rule {
    Rule::new(RuleKind::Literal(text.into()))
}

/// Match one character from `chars`.
pub fn char_set(chars: &str) -> Rule {
    Rule::new(RuleKind::Class(CharClass::Set(chars.chars().collect())))
}

/// Match one character in `lo..=hi`.
pub fn char_range(lo: char, hi: char) -> Rule {
    Rule::new(RuleKind::Class(CharClass::Range(lo, hi)))
}

/// Match one character accepted by `test`. `name` is used for display.
pub fn char_class(name: &'static str, test: fn(char) -> bool) -> Rule {
    Rule::new(RuleKind::Class(CharClass::Named { name, test }))
}

/// Match one character other than `ch`. Fails at end of input.
pub fn not_char(ch: char) -> Rule {
    Rule::new(RuleKind::Class(CharClass::Except(ch)))
}

/// Match any one character. Fails at end of input.
pub fn any_char() -> Rule {
    Rule::new(RuleKind::AnyChar)
}

/// Match the empty string at end of input.
pub fn end_of_input() -> Rule {
    Rule::new(RuleKind::EndOfInput)
}

/// Match every rule in order.
pub fn sequence(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::new(RuleKind::Sequence(rules.into_iter().collect()))
}

/// Match the first alternative that matches.
pub fn choice(rules: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::new(RuleKind::Choice(rules.into_iter().collect()))
}

/// Match `rule` zero or more times. Always matches.
pub fn star(rule: Rule) -> Rule {
    Rule::new(RuleKind::Star(rule))
}

/// Match `rule` one or more times.
pub fn plus(rule: Rule) -> Rule {
    Rule::new(RuleKind::Plus(rule))
}

/// Match `rule` or nothing. Always matches unless `rule` fails fatally.
pub fn opt(rule: Rule) -> Rule {
    Rule::new(RuleKind::Opt(rule))
}

/// Negative lookahead. Never consumes input or builds nodes.
pub fn not(rule: Rule) -> Rule {
    Rule::new(RuleKind::Not(rule))
}

/// A lazy reference to the rule `build` returns.
///
/// `build` runs on this reference's first match and its result is reused by
/// this reference afterwards. Other `delay(build)` values build their own
/// copy; see [`delay_ref`] for a reference that shares one rule.
pub fn delay(build: fn() -> Rule) -> Rule {
    Rule::new(RuleKind::Delay(Delayed::Owned(RuleCell::new(build))))
}

/// A lazy reference to the rule held by `cell`.
///
/// The cell is built on first match. Every reference to the same cell
/// matches the same rule.
pub fn delay_ref(cell: &'static RuleCell) -> Rule {
    Rule::new(RuleKind::Delay(Delayed::Shared(cell)))
}

/// Wrap whatever `rule` matches in a node labeled `label`.
pub fn ast_node(label: &'static str, rule: Rule) -> Rule {
    Rule::new(RuleKind::AstNode { label, rule })
}

/// Commit point: a backtrack from `rule` becomes a fatal error with
/// `message` at the current position.
pub fn no_fail(rule: Rule, message: impl Into<String>) -> Rule {
    Rule::new(RuleKind::NoFail {
        rule,
        message: message.into().into_boxed_str(),
    })
}

impl From<&str> for Rule {
    fn from(text: &str) -> Self {
        literal(text)
    }
}

impl From<char> for Rule {
    fn from(ch: char) -> Self {
        literal(ch.encode_utf8(&mut [0; 4]))
    }
}

// === Display ===

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharClass::Set(chars) => {
                f.write_str("[")?;
                for ch in chars.iter() {
                    write!(f, "{}", ch.escape_default())?;
                }
                f.write_str("]")
            }
            CharClass::Range(lo, hi) => {
                write!(f, "[{}-{}]", lo.escape_default(), hi.escape_default())
            }
            CharClass::Except(ch) => write!(f, "[^{}]", ch.escape_default()),
            CharClass::Named { name, .. } => write!(f, "<{name}>"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, rules: &[Rule], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, rule) in rules.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{rule}")?;
    }
    f.write_str(")")
}

/// PEG notation. Lazy references print as `<delay>` and are not expanded.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            RuleKind::Literal(text) => write!(f, "{text:?}"),
            RuleKind::Class(class) => write!(f, "{class}"),
            RuleKind::AnyChar => f.write_str("."),
            RuleKind::EndOfInput => f.write_str("!."),
            RuleKind::Sequence(rules) => write_list(f, rules, " "),
            RuleKind::Choice(rules) => write_list(f, rules, " / "),
            RuleKind::Star(rule) => write!(f, "{rule}*"),
            RuleKind::Plus(rule) => write!(f, "{rule}+"),
            RuleKind::Opt(rule) => write!(f, "{rule}?"),
            RuleKind::Not(rule) => write!(f, "!{rule}"),
            RuleKind::Delay(_) => f.write_str("<delay>"),
            RuleKind::AstNode { label, rule } => write!(f, "{label}:{rule}"),
            RuleKind::NoFail { rule, message } => write!(f, "{rule}^{message:?}"),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({self})")
    }
}

#[cfg(test)]
mod tests;
