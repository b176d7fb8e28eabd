//! Message source (prefix) decomposition.
//!
//! A source is the `:nick!user@host` (or `:server.name`) part that precedes
//! the command. It is stored as three optional components and rebuilt from
//! them on output.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::fmt::{self, Display, Formatter};

/// The origin of a message, split into `nick!user@host` components.
///
/// Server-name prefixes (no `!` or `@`, at least one `.`) are stored as
/// `host` alone so they survive a round trip unchanged.
#[derive(Clone, Default, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Source {
    /// Nickname, if present.
    pub nick: Option<String>,
    /// Username (ident), if present.
    pub user: Option<String>,
    /// Hostname, or the server name for server-originated lines.
    pub host: Option<String>,
}

impl Source {
    /// Build a user source from its three components.
    ///
    /// # Example
    ///
    /// ```
    /// use slirc_hooks::Source;
    ///
    /// let source = Source::new("nick", "user", "host.example.com");
    /// assert_eq!(source.to_string(), "nick!user@host.example.com");
    /// ```
    pub fn new(nick: impl Into<String>, user: impl Into<String>, host: impl Into<String>) -> Self {
        Source {
            nick: non_empty(nick.into()),
            user: non_empty(user.into()),
            host: non_empty(host.into()),
        }
    }

    /// A source naming only a server.
    pub fn server(name: impl Into<String>) -> Self {
        Source {
            nick: None,
            user: None,
            host: non_empty(name.into()),
        }
    }

    /// Decompose a raw prefix (without the leading `:`).
    ///
    /// This is lenient: it never fails, and empty components are stored
    /// as `None`.
    pub fn parse(s: &str) -> Self {
        #[derive(Copy, Clone, Eq, PartialEq)]
        enum Part {
            Name,
            User,
            Host,
        }

        let mut name = String::new();
        let mut user = String::new();
        let mut host = String::new();
        let mut part = Part::Name;
        let mut is_server = false;

        for c in s.chars() {
            if c == '.' && part == Part::Name {
                is_server = true;
            }

            match c {
                '!' if part == Part::Name => {
                    is_server = false;
                    part = Part::User;
                }
                '@' if part != Part::Host => {
                    is_server = false;
                    part = Part::Host;
                }
                _ => match part {
                    Part::Name => name.push(c),
                    Part::User => user.push(c),
                    Part::Host => host.push(c),
                },
            }
        }

        if is_server {
            Source::server(name)
        } else {
            Source {
                nick: non_empty(name),
                user: non_empty(user),
                host: non_empty(host),
            }
        }
    }

    /// True when no component is present.
    pub fn is_empty(&self) -> bool {
        self.nick.is_none() && self.user.is_none() && self.host.is_none()
    }

    /// Whether this names a server rather than a user.
    pub fn is_server(&self) -> bool {
        self.nick.is_none() && self.user.is_none() && self.host.is_some()
    }

    /// The nickname, if present.
    pub fn nick(&self) -> Option<&str> {
        self.nick.as_deref()
    }

    /// The username, if present.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The hostname or server name, if present.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref nick) = self.nick {
            f.write_str(nick)?;
        }
        if let Some(ref user) = self.user {
            write!(f, "!{}", user)?;
        }
        match (&self.host, self.nick.is_none() && self.user.is_none()) {
            (Some(host), true) => f.write_str(host),
            (Some(host), false) => write!(f, "@{}", host),
            (None, _) => Ok(()),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::parse(s)
    }
}
