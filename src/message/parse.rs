//! Line parsing.
//!
//! Turns one raw line into a [`Message`]: tags are unescaped, the source is
//! decomposed, the command is normalised and CTCP payloads are re-tagged.

use std::str::FromStr;

use tracing::debug;

use crate::ctcp;
use crate::error::{LineIssue, MessageParseError};
use crate::source::Source;

use super::nom_parser::ParsedLine;
use super::tags::{parse_tags, Tags};
use super::types::Message;

/// Normalise a command token.
///
/// All-digit tokens that fit a `u32` become zero-padded three-digit
/// numerics; everything else is upper-cased.
pub(crate) fn normalize_command(token: &str) -> String {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(numeric) = token.parse::<u32>() {
            return format!("{:03}", numeric);
        }
    }
    token.to_ascii_uppercase()
}

impl Message {
    /// Parse a raw line received from `server`.
    ///
    /// A trailing CRLF (or bare LF) is tolerated. Malformed tag entries and
    /// unusable sources are skipped; only a line without a command fails.
    pub fn parse(server: &str, line: &str) -> Result<Message, MessageParseError> {
        Message::parse_with_report(server, line).map(|(msg, _)| msg)
    }

    /// Parse a raw line and return the non-fatal issues found along the way.
    pub fn parse_with_report(
        server: &str,
        line: &str,
    ) -> Result<(Message, Vec<LineIssue>), MessageParseError> {
        let trimmed = line.trim_end_matches(['\r', '\n']);
        let parsed = ParsedLine::parse(trimmed)
            .map_err(|_| MessageParseError::MalformedLine(line.to_owned()))?;

        let mut issues = Vec::new();

        let tags = match parsed.tags {
            Some(raw) => parse_tags(raw, &mut issues),
            None => Tags::new(),
        };

        let source = match parsed.source {
            Some(raw) => {
                let source = Source::parse(raw);
                if source.is_empty() {
                    issues.push(LineIssue::UnrecognizedSource(raw.to_owned()));
                }
                source
            }
            None => Source::default(),
        };

        let mut command = normalize_command(parsed.command);
        let mut params: Vec<String> = parsed.params.iter().map(|p| (*p).to_owned()).collect();
        let mut trailing = parsed.trailing;

        if let Some(body) = parsed.params.get(1) {
            if let Some((kind, ctcp_params)) = ctcp::parse_ctcp(body) {
                if let Some(synthesized) = ctcp::synthesize_command(&command, kind) {
                    let mut retagged = Vec::with_capacity(2 + ctcp_params.len());
                    retagged.push(parsed.params[0].to_owned());
                    retagged.push(kind.to_owned());
                    retagged.extend(ctcp_params.into_iter().map(str::to_owned));
                    command = synthesized;
                    params = retagged;
                    trailing = true;
                }
            }
        }

        for issue in &issues {
            debug!(server = %server, issue = %issue, "non-fatal problem in line");
        }

        let msg = Message {
            server: server.to_owned(),
            tags,
            source,
            command,
            params,
            trailing,
            display_name: None,
        };

        Ok((msg, issues))
    }
}

impl FromStr for Message {
    type Err = MessageParseError;

    /// Parse a line with no server attached.
    fn from_str(s: &str) -> Result<Message, Self::Err> {
        Message::parse("", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_ping() {
        let msg: Message = "PING :server\r\n".parse().unwrap();
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.params, vec!["server"]);
        assert!(msg.tags.is_empty());
    }

    #[test]
    fn test_parse_privmsg() {
        let msg = Message::parse("libera", ":nick!user@host PRIVMSG #channel :Hello, world!")
            .unwrap();
        assert_eq!(msg.server, "libera");
        assert_eq!(msg.nick(), Some("nick"));
        assert_eq!(msg.user(), Some("user"));
        assert_eq!(msg.host(), Some("host"));
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#channel", "Hello, world!"]);
    }

    #[test]
    fn test_parse_with_tags() {
        let msg: Message = "@time=2023-01-01T00:00:00Z;msgid=abc123 :nick PRIVMSG #ch :Hi\r\n"
            .parse()
            .unwrap();
        assert_eq!(msg.tags.len(), 2);
        assert_eq!(msg.tag("time"), Some("2023-01-01T00:00:00Z"));
        assert_eq!(msg.tag("msgid"), Some("abc123"));
    }

    #[test]
    fn test_parse_tag_unescaping() {
        let msg: Message = "@note=a\\sb\\:c PING x".parse().unwrap();
        assert_eq!(msg.tag("note"), Some("a b;c"));
    }

    #[test]
    fn test_numeric_normalization() {
        let msg: Message = ":server 1 nick :Welcome".parse().unwrap();
        assert_eq!(msg.command, "001");

        let msg: Message = ":server 0042 nick".parse().unwrap();
        assert_eq!(msg.command, "042");

        let msg: Message = ":server 433 * nick :in use".parse().unwrap();
        assert_eq!(msg.command, "433");
    }

    #[test]
    fn test_command_uppercased() {
        let msg: Message = "privmsg #c :hi".parse().unwrap();
        assert_eq!(msg.command, "PRIVMSG");
    }

    #[test]
    fn test_normalize_command_edge_cases() {
        assert_eq!(normalize_command("+1"), "+1");
        assert_eq!(normalize_command("99999999999"), "99999999999");
        assert_eq!(normalize_command("1234"), "1234");
        assert_eq!(normalize_command("cap"), "CAP");
    }

    #[test]
    fn test_ctcp_request_retagged() {
        let msg: Message = ":nick!u@h PRIVMSG #c :\x01PING 12345\x01\r\n".parse().unwrap();
        assert_eq!(msg.command, "CTCP_PING");
        assert_eq!(msg.params, vec!["#c", "PING", "12345"]);
        assert_eq!(msg.ctcp_type(), Some("PING"));
        assert_eq!(msg.text(), Some("12345"));
    }

    #[test]
    fn test_ctcp_reply_retagged() {
        let msg: Message = ":nick!u@h NOTICE me :\x01VERSION irssi 1.2.3\x01".parse().unwrap();
        assert_eq!(msg.command, "CTCPREPLY_VERSION");
        assert_eq!(msg.params, vec!["me", "VERSION", "irssi 1.2.3"]);
    }

    #[test]
    fn test_ctcp_without_body() {
        let msg: Message = "PRIVMSG #c :\x01version\x01".parse().unwrap();
        assert_eq!(msg.command, "CTCP_VERSION");
        assert_eq!(msg.params, vec!["#c", "version"]);
    }

    #[test]
    fn test_unterminated_ctcp_is_plain_privmsg() {
        let msg: Message = "PRIVMSG #c :\x01ACTION waves".parse().unwrap();
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#c", "\x01ACTION waves"]);
    }

    #[test]
    fn test_ctcp_only_for_privmsg_and_notice() {
        let msg: Message = "TOPIC #c :\x01PING 1\x01".parse().unwrap();
        assert_eq!(msg.command, "TOPIC");
    }

    #[test]
    fn test_privmsg_without_text() {
        let msg: Message = "PRIVMSG #c".parse().unwrap();
        assert_eq!(msg.command, "PRIVMSG");
        assert_eq!(msg.params, vec!["#c"]);
    }

    #[test]
    fn test_server_source() {
        let msg: Message = ":irc.example.com 001 nick :Welcome".parse().unwrap();
        assert!(msg.source.is_server());
        assert_eq!(msg.host(), Some("irc.example.com"));
        assert_eq!(msg.nick(), None);
    }

    #[test]
    fn test_non_fatal_issues_reported() {
        let (msg, issues) = Message::parse_with_report("s", "@=x;ok=1 : PING y").unwrap();
        assert_eq!(msg.command, "PING");
        assert_eq!(msg.tag("ok"), Some("1"));
        assert!(msg.source.is_empty());
        assert_eq!(
            issues,
            vec![
                LineIssue::UnrecognizedTag("=x".into()),
                LineIssue::UnrecognizedSource(String::new()),
            ]
        );
    }

    #[test]
    fn test_malformed_lines() {
        for line in ["", "\r\n", "@a=b", ":nick", "@a=b :nick \r\n"] {
            match Message::parse("s", line) {
                Err(MessageParseError::MalformedLine(raw)) => assert_eq!(raw, line),
                other => panic!("expected MalformedLine for {:?}, got {:?}", line, other),
            }
        }
    }
}
