//! Error types for line parsing, matcher construction and routing.
//!
//! Only an empty or command-less line is fatal to a parse. Problems with the
//! tag block or the source prefix are reported as [`LineIssue`]s and parsing
//! carries on with the affected fields left empty.

use thiserror::Error;

/// Convenience type alias for Results using [`RouterError`].
pub type Result<T, E = RouterError> = std::result::Result<T, E>;

/// Fatal errors encountered when parsing a raw IRC line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// The line was empty or carried no command token.
    #[error("malformed line: {0:?}")]
    MalformedLine(String),
}

/// Non-fatal problems found while parsing a line.
///
/// These never abort a parse; the offending part is skipped or left empty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LineIssue {
    /// The source prefix did not fit the `nick!user@host` grammar.
    #[error("unrecognized source: {0:?}")]
    UnrecognizedSource(String),

    /// A single tag entry could not be parsed and was dropped.
    #[error("unrecognized tag: {0:?}")]
    UnrecognizedTag(String),
}

/// Errors raised while building a [`Matcher`](crate::Matcher).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatcherError {
    /// The pattern did not compile.
    #[error("invalid pattern: {pattern}")]
    InvalidPattern {
        /// The pattern as given by the caller.
        pattern: String,
        /// The underlying regex error.
        #[source]
        cause: regex::Error,
    },
}

/// Errors raised at registration time.
///
/// Dispatch itself never fails with an error; see
/// [`RouteResult`](crate::RouteResult).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouterError {
    /// The registration was rejected.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A positional pattern could not be built.
    #[error("pattern error: {0}")]
    Pattern(#[from] MatcherError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MessageParseError::MalformedLine(String::new());
        assert_eq!(format!("{}", err), "malformed line: \"\"");

        let issue = LineIssue::UnrecognizedTag("=oops".to_string());
        assert_eq!(format!("{}", issue), "unrecognized tag: \"=oops\"");

        let err = RouterError::Configuration("router is locked".to_string());
        assert_eq!(format!("{}", err), "configuration error: router is locked");
    }

    #[test]
    fn test_error_source_chaining() {
        let cause = regex::Regex::new("(").unwrap_err();
        let err = MatcherError::InvalidPattern {
            pattern: "(".to_string(),
            cause: cause.clone(),
        };

        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), cause.to_string());
    }

    #[test]
    fn test_error_conversion() {
        let cause = regex::Regex::new("[").unwrap_err();
        let err: RouterError = MatcherError::InvalidPattern {
            pattern: "[".to_string(),
            cause,
        }
        .into();

        match err {
            RouterError::Pattern(_) => {}
            _ => panic!("Expected Pattern variant"),
        }
    }
}
