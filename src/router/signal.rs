//! Host signal names.
//!
//! Hosts publish each raw line under a compound signal name such as
//! `libera,irc_raw_in_PRIVMSG`: the server, a comma, a fixed marker and the
//! command.

/// A decoded signal name.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Signal<'a> {
    /// Server named before the first comma, if there was one.
    pub server: Option<&'a str>,
    /// Command suffix after the marker, as published by the host.
    pub command: &'a str,
}

/// Split a signal name into server and command.
///
/// Returns `None` when the part after the comma does not start with
/// `marker` or names no command.
pub fn parse_signal<'a>(signal: &'a str, marker: &str) -> Option<Signal<'a>> {
    let (server, suffix) = match signal.split_once(',') {
        Some((server, suffix)) => (Some(server), suffix),
        None => (None, signal),
    };

    let command = suffix.strip_prefix(marker)?;
    if command.is_empty() {
        return None;
    }

    Some(Signal { server, command })
}
