//! Case-insensitive wildcard matching over graph paths
//!
//! Patterns use glob syntax: `*` matches any run of characters, `?` matches
//! exactly one, everything else is literal. A pattern must match the whole
//! input.

use regex::{Regex, RegexBuilder};

use crate::error::QueryError;

/// Whether a match accepts or rejects the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchBehaviour {
    #[default]
    AcceptOnMatch,
    RejectOnMatch,
}

/// Matches input against any of a set of wildcard patterns.
#[derive(Debug, Clone)]
pub struct WildcardMatcher {
    behaviour: MatchBehaviour,
    expressions: Vec<Regex>,
}

impl WildcardMatcher {
    pub fn new<S: AsRef<str>>(behaviour: MatchBehaviour, patterns: &[S]) -> Result<Self, QueryError> {
        let expressions = patterns
            .iter()
            .map(|pattern| compile(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            behaviour,
            expressions,
        })
    }

    pub fn behaviour(&self) -> MatchBehaviour {
        self.behaviour
    }

    /// True if any pattern matches, inverted for [`MatchBehaviour::RejectOnMatch`].
    pub fn is_match(&self, input: &str) -> bool {
        let matched = self.expressions.iter().any(|e| e.is_match(input));
        match self.behaviour {
            MatchBehaviour::AcceptOnMatch => matched,
            MatchBehaviour::RejectOnMatch => !matched,
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, QueryError> {
    let translated = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");

    RegexBuilder::new(&format!("^{translated}$"))
        .case_insensitive(true)
        .build()
        .map_err(|source| QueryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}
