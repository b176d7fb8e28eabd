//! CTCP (Client-to-Client Protocol) sub-framing.
//!
//! CTCP payloads ride inside the trailing parameter of a PRIVMSG (requests)
//! or NOTICE (replies), wrapped in `\x01` delimiters:
//!
//! ```text
//! PRIVMSG #chan :\x01PING 12345\x01
//! ```
//!
//! The line parser uses these helpers to re-tag such messages as
//! `CTCP_<TYPE>` / `CTCPREPLY_<TYPE>`; the serializer uses
//! [`construct_ctcp`] to put them back.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>
//!
//! # Example
//!
//! ```
//! use slirc_hooks::ctcp::{construct_ctcp, is_ctcp, parse_ctcp};
//!
//! let body = "\x01ACTION waves hello\x01";
//! assert!(is_ctcp(body));
//!
//! let (kind, params) = parse_ctcp(body).unwrap();
//! assert_eq!(kind, "ACTION");
//! assert_eq!(params, vec!["waves hello"]);
//!
//! assert_eq!(construct_ctcp(kind, params.first().copied()), body);
//! ```

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// Command prefix for re-tagged CTCP requests (PRIVMSG).
pub const CTCP_REQUEST_PREFIX: &str = "CTCP_";

/// Command prefix for re-tagged CTCP replies (NOTICE).
pub const CTCP_REPLY_PREFIX: &str = "CTCPREPLY_";

/// Whether a parameter is a CTCP-framed payload.
///
/// True when the text starts and ends with `\x01` and is at least two
/// characters long.
#[inline]
pub fn is_ctcp(param: &str) -> bool {
    param.len() >= 2 && param.starts_with(CTCP_DELIM) && param.ends_with(CTCP_DELIM)
}

/// Split a CTCP payload into its type token and parameters.
///
/// The body after the first space is kept whole as a single parameter,
/// exactly as a trailing IRC parameter would be; splitting it further is up
/// to whatever handles the particular CTCP type. A body that is present but
/// empty (`"\x01PING \x01"`) yields one empty parameter.
///
/// Returns `None` for text that is not CTCP-framed or whose type token is
/// empty.
pub fn parse_ctcp(param: &str) -> Option<(&str, Vec<&str>)> {
    if !is_ctcp(param) {
        return None;
    }

    let inner = &param[1..param.len() - 1];
    let (kind, params) = match inner.split_once(' ') {
        Some((kind, body)) => (kind, vec![body]),
        None => (inner, Vec::new()),
    };

    if kind.is_empty() {
        return None;
    }

    Some((kind, params))
}

/// Wrap a type and optional body in CTCP delimiters.
///
/// When `body` is `None` no separating space is written.
pub fn construct_ctcp(kind: &str, body: Option<&str>) -> String {
    let mut out = String::with_capacity(kind.len() + body.map_or(0, |b| b.len() + 1) + 2);
    out.push(CTCP_DELIM);
    out.push_str(kind);
    if let Some(body) = body {
        out.push(' ');
        out.push_str(body);
    }
    out.push(CTCP_DELIM);
    out
}

/// The re-tagged command for a CTCP payload carried by `base`.
///
/// Only PRIVMSG and NOTICE carry CTCP; any other command yields `None`.
pub(crate) fn synthesize_command(base: &str, kind: &str) -> Option<String> {
    let prefix = match base {
        "PRIVMSG" => CTCP_REQUEST_PREFIX,
        "NOTICE" => CTCP_REPLY_PREFIX,
        _ => return None,
    };
    Some(format!("{}{}", prefix, kind.to_ascii_uppercase()))
}

/// Split a re-tagged command back into its wire command and CTCP type.
///
/// `"CTCP_PING"` becomes `("PRIVMSG", "PING")` and `"CTCPREPLY_VERSION"`
/// becomes `("NOTICE", "VERSION")`. The type is taken from the original
/// command before anything is rewritten.
pub fn split_synthesized(command: &str) -> Option<(&'static str, &str)> {
    if let Some(kind) = command.strip_prefix(CTCP_REPLY_PREFIX) {
        return (!kind.is_empty()).then_some(("NOTICE", kind));
    }
    if let Some(kind) = command.strip_prefix(CTCP_REQUEST_PREFIX) {
        return (!kind.is_empty()).then_some(("PRIVMSG", kind));
    }
    None
}
