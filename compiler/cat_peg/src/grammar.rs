//! Named rule tables.
//!
//! A [`Grammar`] maps rule names to [`Rule`]s and designates one entry
//! rule. It is immutable once built and is `Send + Sync`, so a grammar
//! kept in a `static` can serve any number of concurrent parses.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{GrammarError, GrammarParseError, ParseError};
use crate::options::ParseOptions;
use crate::parser::parse_with_options;
use crate::rule::Rule;
use crate::tree::Ast;

/// An immutable set of named rules with one entry point.
#[derive(Debug)]
pub struct Grammar {
    entry_name: &'static str,
    entry: Rule,
    rules: FxHashMap<&'static str, Rule>,
}

/// Collects rule definitions for a [`Grammar`].
#[derive(Debug)]
#[must_use]
pub struct GrammarBuilder {
    entry: &'static str,
    rules: Vec<(&'static str, Rule)>,
}

impl GrammarBuilder {
    /// Register `rule` under `name`.
    pub fn define(mut self, name: &'static str, rule: Rule) -> Self {
        self.rules.push((name, rule));
        self
    }

    /// Validate the definitions and build the table.
    ///
    /// # Errors
    ///
    /// [`GrammarError::DuplicateRule`] if a name was defined twice,
    /// [`GrammarError::UnknownEntry`] if the entry rule was never defined.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut rules =
            FxHashMap::with_capacity_and_hasher(self.rules.len(), rustc_hash::FxBuildHasher);
        for (name, rule) in self.rules {
            if rules.insert(name, rule).is_some() {
                return Err(GrammarError::DuplicateRule(name));
            }
        }
        let entry = rules
            .get(self.entry)
            .cloned()
            .ok_or(GrammarError::UnknownEntry(self.entry))?;
        debug!(entry = self.entry, rules = rules.len(), "grammar built");
        Ok(Grammar {
            entry_name: self.entry,
            entry,
            rules,
        })
    }
}

impl Grammar {
    /// Start a table whose entry rule will be `entry`.
    pub fn builder(entry: &'static str) -> GrammarBuilder {
        GrammarBuilder {
            entry,
            rules: Vec::new(),
        }
    }

    /// Name of the entry rule.
    #[inline]
    pub fn entry_name(&self) -> &'static str {
        self.entry_name
    }

    /// The entry rule.
    #[inline]
    pub fn entry(&self) -> &Rule {
        &self.entry
    }

    /// Look up a rule by name.
    ///
    /// # Errors
    ///
    /// [`GrammarError::UnknownRule`] if no rule has that name.
    pub fn rule(&self, name: &str) -> Result<&Rule, GrammarError> {
        self.rules
            .get(name)
            .ok_or_else(|| GrammarError::UnknownRule(name.to_owned()))
    }

    /// Rule names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.rules.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of rules.
    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always `false` for a built grammar, which holds at least its entry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse `source` from the entry rule.
    pub fn parse(&self, source: &str) -> Result<Ast, ParseError> {
        self.parse_with_options(source, &ParseOptions::default())
    }

    /// Parse `source` from the entry rule with explicit limits.
    pub fn parse_with_options(
        &self,
        source: &str,
        options: &ParseOptions,
    ) -> Result<Ast, ParseError> {
        parse_with_options(source, &self.entry, options)
    }

    /// Parse `source` starting from the rule called `name`.
    ///
    /// # Errors
    ///
    /// [`GrammarParseError::Grammar`] if `name` is unknown, otherwise the
    /// parse error, if any.
    pub fn parse_rule(&self, name: &str, source: &str) -> Result<Ast, GrammarParseError> {
        let rule = self.rule(name)?;
        Ok(parse_with_options(source, rule, &ParseOptions::default())?)
    }
}

#[cfg(test)]
mod tests;
