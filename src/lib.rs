//! # slirc-hooks
//!
//! Parsing, serialization and command-filtered dispatch of raw IRC lines
//! for chat-client plugin hosts.
//!
//! ## Features
//!
//! - Raw line parsing with IRCv3 tags, decomposed sources and CTCP re-tagging
//! - Byte-exact serialization back to wire format
//! - Positional parameter patterns with exact, regex and glob matchers
//! - A dispatch table that parses each line at most once
//! - Host-driven and tokio-backed deferred callbacks
//! - Optional Twitch display-name support

#![deny(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ### Parsing and serializing
//!
//! ```rust
//! use slirc_hooks::Message;
//!
//! let raw = "@time=2023-01-01T12:00:00Z :nick!user@host PRIVMSG #channel :Hello!";
//! let message = Message::parse("libera", raw).expect("valid IRC line");
//!
//! assert_eq!(message.tag("time"), Some("2023-01-01T12:00:00Z"));
//! assert_eq!(message.nick(), Some("nick"));
//! assert_eq!(message.to_string(), format!("{}\r\n", raw));
//! ```
//!
//! ### Routing
//!
//! ```rust
//! use slirc_hooks::{Message, RouteResult, Router};
//!
//! let mut router = Router::new();
//! router
//!     .on("CTCP_PING", Vec::<&str>::new(), |_: &str, msg: &Message| {
//!         assert_eq!(msg.text(), Some("12345"));
//!         RouteResult::EatAndStop
//!     })
//!     .unwrap();
//!
//! let result = router.route(
//!     "libera",
//!     "libera,irc_raw_in_PRIVMSG",
//!     ":nick!u@h PRIVMSG me :\x01PING 12345\x01",
//! );
//! assert_eq!(result.as_code(), 1);
//! ```

pub mod config;
pub mod ctcp;
pub mod error;
pub mod matcher;
pub mod message;
pub mod router;
pub mod schedule;
pub mod source;
pub mod tracker;
pub mod twitch;

pub use self::config::RouterConfig;
pub use self::error::{LineIssue, MatcherError, MessageParseError, RouterError};
pub use self::matcher::{match_positions, Matcher};
pub use self::message::{Field, Message, MessagePatch, Tag, Tags, MAX_MIDDLE_PARAMS};
pub use self::router::{Handler, RouteResult, Router};
pub use self::schedule::{CancelHandle, Scheduler, TimerId, TimerTable};
#[cfg(feature = "tokio")]
pub use self::schedule::TokioScheduler;
pub use self::source::Source;
