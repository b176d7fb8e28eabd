use crate::ctcp::{self, CTCP_REPLY_PREFIX, CTCP_REQUEST_PREFIX};
use crate::source::Source;

use super::tags::Tags;

/// A parsed IRC line, as handed to route handlers.
///
/// Built fresh for every incoming line and shared read-only by all handlers
/// of one dispatch pass. Use [`MessagePatch`](super::MessagePatch) to derive
/// a modified copy.
///
/// CTCP-framed PRIVMSG and NOTICE lines are re-tagged: the command becomes
/// `CTCP_<TYPE>` or `CTCPREPLY_<TYPE>` and `params` holds
/// `[target, <type as received>, <body>?]`.
///
/// # Example
///
/// ```
/// use slirc_hooks::Message;
///
/// let msg = Message::parse("libera", ":nick!u@h PRIVMSG #c :\x01PING 12345\x01").unwrap();
/// assert_eq!(msg.command, "CTCP_PING");
/// assert_eq!(msg.params, vec!["#c", "PING", "12345"]);
/// assert_eq!(msg.nick(), Some("nick"));
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// The server this line came from, supplied by the caller.
    pub server: String,
    /// IRCv3 message tags; empty when the line had no `@` block.
    pub tags: Tags,
    /// The decomposed source prefix.
    pub source: Source,
    /// Upper-cased command, zero-padded numeric, or synthesized CTCP command.
    pub command: String,
    /// Parameters, trailing one included.
    pub params: Vec<String>,
    /// Whether the last parameter arrived in `:` trailing form.
    pub trailing: bool,
    /// Platform display name, filled in by a post-parse hook.
    pub display_name: Option<String>,
}

impl Message {
    /// Create a message from a command and its parameters.
    ///
    /// The command is stored as given.
    pub fn new<C, P, S>(command: C, params: P) -> Self
    where
        C: Into<String>,
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Message {
            command: command.into(),
            params: params.into_iter().map(Into::into).collect(),
            ..Message::default()
        }
    }

    /// Create a PRIVMSG to a target.
    #[must_use]
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        let mut msg = Message::new("PRIVMSG", [target.into(), text.into()]);
        msg.trailing = true;
        msg
    }

    /// Create a NOTICE to a target.
    #[must_use]
    pub fn notice(target: impl Into<String>, text: impl Into<String>) -> Self {
        let mut msg = Message::new("NOTICE", [target.into(), text.into()]);
        msg.trailing = true;
        msg
    }

    /// Create a CTCP request in re-tagged form.
    ///
    /// # Example
    ///
    /// ```
    /// use slirc_hooks::Message;
    ///
    /// let msg = Message::ctcp("#c", "ACTION", Some("waves"));
    /// assert_eq!(msg.to_string(), "PRIVMSG #c :\x01ACTION waves\x01\r\n");
    /// ```
    #[must_use]
    pub fn ctcp(target: impl Into<String>, kind: &str, body: Option<&str>) -> Self {
        let mut params = vec![target.into(), kind.to_owned()];
        params.extend(body.map(str::to_owned));
        let mut msg = Message::new(format!("{}{}", CTCP_REQUEST_PREFIX, kind.to_ascii_uppercase()), params);
        msg.trailing = true;
        msg
    }

    /// Create a CTCP reply in re-tagged form.
    #[must_use]
    pub fn ctcp_reply(target: impl Into<String>, kind: &str, body: Option<&str>) -> Self {
        let mut msg = Message::ctcp(target, kind, body);
        msg.command = format!("{}{}", CTCP_REPLY_PREFIX, kind.to_ascii_uppercase());
        msg
    }

    /// Set the server name.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Set the source.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Add or replace a single tag.
    #[must_use]
    pub fn with_tag<K, V>(mut self, key: K, value: Option<V>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.tags.insert(key, value.map(Into::into));
        self
    }

    /// The source nickname, if any.
    pub fn nick(&self) -> Option<&str> {
        self.source.nick()
    }

    /// The source username, if any.
    pub fn user(&self) -> Option<&str> {
        self.source.user()
    }

    /// The source host (or server name), if any.
    pub fn host(&self) -> Option<&str> {
        self.source.host()
    }

    /// Get the value of an IRCv3 tag by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }

    /// Get a parameter by index.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// The first parameter: the channel or nick for PRIVMSG, NOTICE and
    /// their CTCP forms.
    pub fn target(&self) -> Option<&str> {
        self.param(0)
    }

    /// The message text of a PRIVMSG or NOTICE, or the CTCP body of a
    /// re-tagged message.
    pub fn text(&self) -> Option<&str> {
        if self.is_ctcp() {
            self.param(2)
        } else {
            self.param(1)
        }
    }

    /// Whether this message was re-tagged from a CTCP payload.
    pub fn is_ctcp(&self) -> bool {
        ctcp::split_synthesized(&self.command).is_some()
    }

    /// The upper-cased CTCP type of a re-tagged message.
    pub fn ctcp_type(&self) -> Option<&str> {
        ctcp::split_synthesized(&self.command).map(|(_, kind)| kind)
    }

    /// Whether the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }

    /// The serialized wire line, CRLF-terminated.
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}
