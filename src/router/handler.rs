use crate::message::Message;

/// What a handler wants done with the line after it ran.
///
/// The variants map onto the usual plugin-host return codes via
/// [`as_code`](RouteResult::as_code).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum RouteResult {
    /// Keep going: later handlers and the host still see the line.
    #[default]
    Continue,
    /// Stop here and tell the host to swallow the line.
    EatAndStop,
    /// Stop here and report a failure.
    Error,
}

impl RouteResult {
    /// Host return code: `0` ok, `1` ok-and-eat, `-1` error.
    pub const fn as_code(self) -> i32 {
        match self {
            RouteResult::Continue => 0,
            RouteResult::EatAndStop => 1,
            RouteResult::Error => -1,
        }
    }

    /// Whether this result ends the dispatch pass.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, RouteResult::Continue)
    }
}

/// A route handler.
///
/// Implemented for every `Fn(&str, &Message) -> RouteResult`, so plain
/// closures can be registered directly. The first argument is the server
/// name the line arrived on.
pub trait Handler {
    /// Handle one message.
    fn handle(&self, server: &str, msg: &Message) -> RouteResult;
}

impl<F> Handler for F
where
    F: Fn(&str, &Message) -> RouteResult,
{
    fn handle(&self, server: &str, msg: &Message) -> RouteResult {
        self(server, msg)
    }
}
