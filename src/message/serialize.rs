use std::fmt::{self, Display, Formatter, Write};

use crate::ctcp::{construct_ctcp, split_synthesized};

use super::nom_parser::MAX_MIDDLE_PARAMS;
use super::types::Message;

/// Check if the last parameter needs a `:` prefix to survive re-parsing.
#[inline]
fn needs_colon_prefix(s: &str, index: usize) -> bool {
    s.is_empty() || s.starts_with(':') || (s.contains(' ') && index < MAX_MIDDLE_PARAMS)
}

fn write_params(f: &mut Formatter<'_>, params: &[&str], force_trailing: bool) -> fmt::Result {
    let Some((last, middle)) = params.split_last() else {
        return Ok(());
    };

    for param in middle {
        f.write_char(' ')?;
        f.write_str(param)?;
    }

    f.write_char(' ')?;
    if force_trailing || needs_colon_prefix(last, middle.len()) {
        f.write_char(':')?;
    }
    f.write_str(last)
}

impl Display for Message {
    /// Writes the wire form of the message, CRLF-terminated.
    ///
    /// Re-tagged CTCP commands go out as PRIVMSG or NOTICE with the payload
    /// rebuilt in the second parameter.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.tags.is_empty() {
            write!(f, "@{} ", self.tags)?;
        }

        if !self.source.is_empty() {
            write!(f, ":{} ", self.source)?;
        }

        match split_synthesized(&self.command) {
            Some((command, kind)) => {
                f.write_str(command)?;
                let payload;
                let mut params: Vec<&str> = Vec::with_capacity(2);
                if let Some(target) = self.params.first() {
                    params.push(target);
                    payload = construct_ctcp(kind, self.params.get(2).map(String::as_str));
                    params.push(&payload);
                }
                write_params(f, &params, true)?;
            }
            None => {
                f.write_str(&self.command)?;
                let params: Vec<&str> = self.params.iter().map(String::as_str).collect();
                write_params(f, &params, self.trailing)?;
            }
        }

        f.write_str("\r\n")
    }
}
