//! Command-filtered dispatch of raw lines.
//!
//! A [`Router`] owns a table of `(command, positional pattern, handler)`
//! routes. For every raw line the host delivers, [`Router::route`] resolves
//! the command from the signal name, skips the line cheaply when nobody is
//! interested, parses it once and runs every matching handler in
//! registration order until one of them returns a terminal result.
//!
//! # Example
//!
//! ```
//! use slirc_hooks::{Matcher, Message, RouteResult, Router};
//!
//! let mut router = Router::new();
//! router
//!     .on("PRIVMSG", [Matcher::glob("#*").unwrap()], |_server: &str, msg: &Message| {
//!         assert_eq!(msg.text(), Some("hello"));
//!         RouteResult::EatAndStop
//!     })
//!     .unwrap();
//!
//! let result = router.route("libera", "libera,irc_raw_in_PRIVMSG", ":a!b@c PRIVMSG #rust :hello");
//! assert_eq!(result, RouteResult::EatAndStop);
//! ```

mod handler;
pub mod signal;

use std::any::Any;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, trace, warn};

use crate::config::RouterConfig;
use crate::ctcp::{CTCP_REPLY_PREFIX, CTCP_REQUEST_PREFIX};
use crate::error::{Result, RouterError};
use crate::matcher::{match_positions, Matcher};
use crate::message::{normalize_command, Message};
use crate::twitch;

pub use self::handler::{Handler, RouteResult};

/// Hook run on every parsed message before dispatch.
pub type PostParseHook = Box<dyn Fn(&mut Message)>;

struct Route {
    pattern: Vec<Option<Matcher>>,
    handler: Box<dyn Handler>,
}

/// Dispatch table for incoming lines.
///
/// Routes are expected to be registered before the first call to
/// [`route`](Router::route). Registration takes `&mut self`, so the table
/// can never change underneath a dispatch pass.
pub struct Router {
    config: RouterConfig,
    routes: HashMap<String, Vec<Route>>,
    post_parse: Option<PostParseHook>,
    ctcp_requests: bool,
    ctcp_replies: bool,
    dispatched: Cell<bool>,
}

impl Default for Router {
    fn default() -> Self {
        Router::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("commands", &self.commands())
            .field("post_parse", &self.post_parse.is_some())
            .finish()
    }
}

impl Router {
    /// Create an empty router with the default configuration.
    pub fn new() -> Self {
        Router::with_config(RouterConfig::default())
    }

    /// Create an empty router.
    pub fn with_config(config: RouterConfig) -> Self {
        Router {
            config,
            routes: HashMap::new(),
            post_parse: None,
            ctcp_requests: false,
            ctcp_replies: false,
            dispatched: Cell::new(false),
        }
    }

    /// A router that fills in [`Message::display_name`] from Twitch tags.
    pub fn twitch() -> Self {
        Router::new().with_post_parse(twitch::populate)
    }

    /// Run `hook` on every parsed message before any handler sees it.
    pub fn with_post_parse<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Message) + 'static,
    {
        self.post_parse = Some(Box::new(hook));
        self
    }

    /// The configuration this router was built with.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Append a route for `command`.
    ///
    /// `command` is normalised like a parsed command (upper-cased, numerics
    /// zero-padded), so `"privmsg"` and `"PRIVMSG"` share one route list.
    /// `None` entries in `pattern` accept any token at that position.
    pub fn register<H>(&mut self, command: &str, pattern: Vec<Option<Matcher>>, handler: H) -> Result<()>
    where
        H: Handler + 'static,
    {
        let command = command.trim();
        if command.is_empty() {
            return Err(RouterError::Configuration(
                "route command must not be empty".to_owned(),
            ));
        }
        if self.config.lock_after_dispatch && self.dispatched.get() {
            return Err(RouterError::Configuration(format!(
                "cannot register {} after dispatch has started",
                command
            )));
        }

        let command = normalize_command(command);
        if command.starts_with(CTCP_REPLY_PREFIX) {
            self.ctcp_replies = true;
        } else if command.starts_with(CTCP_REQUEST_PREFIX) {
            self.ctcp_requests = true;
        }

        debug!(command = %command, positions = pattern.len(), "route registered");
        self.routes.entry(command).or_default().push(Route {
            pattern,
            handler: Box::new(handler),
        });
        Ok(())
    }

    /// Append a route whose every position must match.
    ///
    /// Accepts anything convertible into a [`Matcher`]; plain strings become
    /// exact matches.
    pub fn on<P, M, H>(&mut self, command: &str, pattern: P, handler: H) -> Result<()>
    where
        P: IntoIterator<Item = M>,
        M: Into<Matcher>,
        H: Handler + 'static,
    {
        let pattern = pattern.into_iter().map(|m| Some(m.into())).collect();
        self.register(command, pattern, handler)
    }

    /// Number of routes registered for `command`.
    pub fn handler_count(&self, command: &str) -> usize {
        self.routes
            .get(&normalize_command(command))
            .map_or(0, Vec::len)
    }

    /// Commands with at least one route, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        commands.sort_unstable();
        commands
    }

    /// Route one raw line published under `signal`.
    ///
    /// The server is taken from the signal name when it carries one,
    /// otherwise `server` is used. Lines nobody is interested in are not
    /// parsed. A line that cannot be parsed yields [`RouteResult::Error`]
    /// without running any handler.
    pub fn route(&self, server: &str, signal: &str, payload: &str) -> RouteResult {
        self.dispatched.set(true);

        let Some(sig) = signal::parse_signal(signal, &self.config.signal_marker) else {
            trace!(signal, "ignoring foreign signal");
            return RouteResult::Continue;
        };
        let server = sig.server.unwrap_or(server);
        let command = normalize_command(sig.command);

        if !self.wants(&command) {
            trace!(command = %command, "no routes, skipping parse");
            return RouteResult::Continue;
        }

        let mut msg = match Message::parse(server, payload) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(server, command = %command, error = %err, "dropping unparseable line");
                return RouteResult::Error;
            }
        };
        if let Some(hook) = &self.post_parse {
            hook(&mut msg);
        }

        self.dispatch(&msg)
    }

    /// Run the routes for an already parsed message.
    ///
    /// The message's own command selects the route list and its `server`
    /// field is passed to handlers.
    pub fn dispatch(&self, msg: &Message) -> RouteResult {
        self.dispatched.set(true);

        let Some(routes) = self.routes.get(&msg.command) else {
            return RouteResult::Continue;
        };

        for (index, route) in routes.iter().enumerate() {
            if !match_positions(&route.pattern, &msg.params) {
                continue;
            }

            let result = self.invoke(route, msg);
            if result.is_terminal() {
                debug!(command = %msg.command, route = index, ?result, "dispatch stopped");
                return result;
            }
        }

        RouteResult::Continue
    }

    fn wants(&self, command: &str) -> bool {
        if self.routes.contains_key(command) {
            return true;
        }
        match command {
            "PRIVMSG" => self.ctcp_requests,
            "NOTICE" => self.ctcp_replies,
            _ => false,
        }
    }

    fn invoke(&self, route: &Route, msg: &Message) -> RouteResult {
        if !self.config.catch_handler_panics {
            return route.handler.handle(&msg.server, msg);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| route.handler.handle(&msg.server, msg))) {
            Ok(result) => result,
            Err(payload) => {
                error!(
                    command = %msg.command,
                    panic = panic_message(payload.as_ref()),
                    "handler panicked"
                );
                RouteResult::Error
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic>"
    }
}
