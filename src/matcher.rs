//! Token predicates used to filter messages by positional parameter.
//!
//! A [`Matcher`] tests one parameter. A positional pattern is a slice of
//! `Option<Matcher>` checked against the leading parameters of a message
//! with [`match_positions`]; `None` entries match anything.
//!
//! # Example
//!
//! ```
//! use slirc_hooks::matcher::{match_positions, Matcher};
//!
//! let bang = Matcher::glob("!*").unwrap();
//! assert!(bang.matches("!uguu"));
//! assert!(!bang.matches("uguu"));
//!
//! let pattern = [None, Some(Matcher::exact("#c"))];
//! assert!(match_positions(&pattern, &["nick", "#c", "extra"]));
//! ```

use std::fmt;

use regex::Regex;

use crate::error::MatcherError;

/// A predicate over a single string token.
#[derive(Clone)]
pub enum Matcher {
    /// Byte-for-byte equality.
    Exact(String),
    /// The compiled pattern must match the whole token.
    RegexFull(Regex),
}

impl Matcher {
    /// Match a token exactly.
    pub fn exact(spec: impl Into<String>) -> Self {
        Matcher::Exact(spec.into())
    }

    /// Compile a regular expression that must match the entire token.
    pub fn regex(pattern: &str) -> Result<Self, MatcherError> {
        let anchored = format!(r"\A(?:{})\z", pattern);
        Regex::new(&anchored)
            .map(Matcher::RegexFull)
            .map_err(|cause| MatcherError::InvalidPattern {
                pattern: pattern.to_owned(),
                cause,
            })
    }

    /// Translate a wildcard pattern into a full-match regex.
    ///
    /// Literal runs are escaped and every `*` becomes `.*`. Matching is
    /// case-sensitive.
    pub fn glob(spec: &str) -> Result<Self, MatcherError> {
        let translated = spec
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        Matcher::regex(&translated)
    }

    /// Test a single token.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Matcher::Exact(spec) => spec == token,
            Matcher::RegexFull(re) => re.is_match(token),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Exact(spec) => f.debug_tuple("Exact").field(spec).finish(),
            Matcher::RegexFull(re) => f.debug_tuple("RegexFull").field(&re.as_str()).finish(),
        }
    }
}

impl From<&str> for Matcher {
    fn from(spec: &str) -> Self {
        Matcher::exact(spec)
    }
}

impl From<String> for Matcher {
    fn from(spec: String) -> Self {
        Matcher::Exact(spec)
    }
}

/// Check a positional pattern against the leading tokens.
///
/// Fails when the pattern is longer than `tokens`. Otherwise each `Some`
/// position must match its token; `None` positions and any tokens past the
/// end of the pattern are unconstrained.
pub fn match_positions<S: AsRef<str>>(pattern: &[Option<Matcher>], tokens: &[S]) -> bool {
    if pattern.len() > tokens.len() {
        return false;
    }

    pattern
        .iter()
        .zip(tokens)
        .all(|(spec, token)| match spec {
            Some(matcher) => matcher.matches(token.as_ref()),
            None => true,
        })
}
