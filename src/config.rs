//! Router configuration.

/// Signal marker used by hosts that publish raw lines as
/// `<server>,irc_raw_in_<COMMAND>`.
pub const DEFAULT_SIGNAL_MARKER: &str = "irc_raw_in_";

/// Settings for a [`Router`](crate::Router).
///
/// # Example
///
/// ```
/// use slirc_hooks::{Router, RouterConfig};
///
/// let config = RouterConfig {
///     lock_after_dispatch: true,
///     ..RouterConfig::default()
/// };
/// let router = Router::with_config(config);
/// assert_eq!(router.config().signal_marker, "irc_raw_in_");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouterConfig {
    /// Prefix stripped from the command part of the signal name.
    pub signal_marker: String,
    /// Reject registrations once the first line has been routed.
    pub lock_after_dispatch: bool,
    /// Turn a panicking handler into [`RouteResult::Error`](crate::RouteResult::Error)
    /// instead of unwinding through the host.
    pub catch_handler_panics: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            signal_marker: DEFAULT_SIGNAL_MARKER.to_owned(),
            lock_after_dispatch: false,
            catch_handler_panics: true,
        }
    }
}
