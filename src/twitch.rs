//! Twitch chat extension.
//!
//! Twitch sends the user's preferred capitalisation in the `display-name`
//! tag. [`populate`] is a post-parse hook that copies it onto
//! [`Message::display_name`], falling back to the source nick.

use crate::message::{Message, Tags};

/// Tag carrying the Twitch display name.
pub const DISPLAY_NAME_TAG: &str = "display-name";

/// The name to show for a sender.
///
/// Uses the `display-name` tag when present and non-empty, otherwise the
/// nick, otherwise an empty string.
pub fn display_name(tags: &Tags, nick: Option<&str>) -> String {
    match tags.get(DISPLAY_NAME_TAG) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => nick.unwrap_or_default().to_owned(),
    }
}

/// Post-parse hook filling [`Message::display_name`].
pub fn populate(msg: &mut Message) {
    msg.display_name = Some(display_name(&msg.tags, msg.source.nick()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_tag() {
        let msg: Message = "@display-name=DunkOrSlam :dunkorslam!d@d.tmi.twitch.tv PRIVMSG #c :hi"
            .parse()
            .unwrap();
        assert_eq!(display_name(&msg.tags, msg.nick()), "DunkOrSlam");
    }

    #[test]
    fn test_falls_back_to_nick() {
        let msg: Message = "@display-name= :someone!s@s.tmi.twitch.tv PRIVMSG #c :hi"
            .parse()
            .unwrap();
        assert_eq!(display_name(&msg.tags, msg.nick()), "someone");

        let msg: Message = ":someone!s@s.tmi.twitch.tv PRIVMSG #c :hi".parse().unwrap();
        assert_eq!(display_name(&msg.tags, msg.nick()), "someone");
    }

    #[test]
    fn test_no_tag_no_nick() {
        let msg: Message = ":tmi.twitch.tv PING :x".parse().unwrap();
        assert_eq!(display_name(&msg.tags, msg.nick()), "");
    }

    #[test]
    fn test_populate() {
        let mut msg: Message = "@display-name=Bob :bob!b@h PRIVMSG #c :hi".parse().unwrap();
        assert_eq!(msg.display_name, None);
        populate(&mut msg);
        assert_eq!(msg.display_name.as_deref(), Some("Bob"));
    }
}
