use crate::error::{TaxonomyError, TaxonomyResult};
use regex::Regex;

/// Compile a rule pattern, keeping the source text in the error.
pub fn compile(pattern: &str) -> TaxonomyResult<Regex> {
    Regex::new(pattern).map_err(|source| TaxonomyError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// A predicate over the upper-cased view of normalized text.
///
/// Literal arms are given in upper case; callers never pass mixed-case text.
#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(&'static str),
    Equals(&'static str),
    Pattern(Regex),
    AnyOf(Vec<Matcher>),
    AllOf(Vec<Matcher>),
}

impl Matcher {
    /// Word-bounded token, e.g. `word("AG-?ACNP")` matches "AGACNP" and
    /// "AG-ACNP" but not "XAGACNP".
    pub fn word(token: &str) -> TaxonomyResult<Self> {
        Ok(Matcher::Pattern(compile(&format!(r"\b(?:{token})\b"))?))
    }

    pub fn pattern(pattern: &str) -> TaxonomyResult<Self> {
        Ok(Matcher::Pattern(compile(pattern)?))
    }

    pub fn contains_any(needles: &[&'static str]) -> Self {
        Matcher::AnyOf(needles.iter().map(|&n| Matcher::Contains(n)).collect())
    }

    pub fn equals_any(values: &[&'static str]) -> Self {
        Matcher::AnyOf(values.iter().map(|&v| Matcher::Equals(v)).collect())
    }

    pub fn is_match(&self, upper: &str) -> bool {
        match self {
            Matcher::Contains(needle) => upper.contains(needle),
            Matcher::Equals(value) => upper == *value,
            Matcher::Pattern(regex) => regex.is_match(upper),
            Matcher::AnyOf(matchers) => matchers.iter().any(|m| m.is_match(upper)),
            Matcher::AllOf(matchers) => matchers.iter().all(|m| m.is_match(upper)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule<T> {
    pub name: &'static str,
    pub matcher: Matcher,
    pub outcome: T,
}

/// First-match-wins rule list.
///
/// Order encodes precedence: specific rules go before the broad ones they
/// would otherwise be shadowed by. Never reorder or dedupe.
#[derive(Debug, Clone)]
pub struct OrderedRules<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for OrderedRules<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> OrderedRules<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, name: &'static str, matcher: Matcher, outcome: T) -> Self {
        self.rules.push(Rule {
            name,
            matcher,
            outcome,
        });
        self
    }

    pub fn first_match(&self, upper: &str) -> Option<&Rule<T>> {
        self.rules.iter().find(|rule| rule.matcher.is_match(upper))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
