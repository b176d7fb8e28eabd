//! Property-based tests for parsing, serialization and matching.
//!
//! Uses proptest to generate random IRC components and verify that:
//! 1. Parsing never panics, whatever the input
//! 2. Generated lines survive parse and serialize byte for byte
//! 3. Matcher and positional pattern invariants hold

use proptest::prelude::*;
use slirc_hooks::ctcp::{construct_ctcp, parse_ctcp};
use slirc_hooks::message::tags::escape_tag_value;
use slirc_hooks::{match_positions, Matcher, Message, MAX_MIDDLE_PARAMS};

// =============================================================================
// STRATEGIES - Generators for valid IRC components
// =============================================================================

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("~?[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

fn source_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z]+\\.[a-z]+\\.[a-z]+").expect("valid regex"),
        (nickname_strategy(), username_strategy(), hostname_strategy())
            .prop_map(|(nick, user, host)| format!("{}!{}@{}", nick, user, host)),
        nickname_strategy(),
    ]
}

fn tag_strategy() -> impl Strategy<Value = String> {
    (
        prop::string::string_regex("\\+?[a-zA-Z][a-zA-Z0-9\\-]{0,15}(/[a-z\\-]{1,10})?")
            .expect("valid regex"),
        prop::option::of(prop::string::string_regex("[^\\x00]{0,30}").expect("valid regex")),
    )
        .prop_map(|(key, value)| match value {
            Some(value) => {
                let mut out = format!("{}=", key);
                escape_tag_value(&mut out, &value).expect("writing to a String");
                out
            }
            None => key,
        })
}

fn command_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "PRIVMSG", "NOTICE", "PING", "JOIN", "PART", "KICK", "MODE", "TOPIC", "001", "353",
    ])
    .prop_map(str::to_owned)
}

fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9#&+\\-=*,.]{1,12}").expect("valid regex")
}

/// Trailing text: anything but line breaks, NUL and the CTCP delimiter.
fn trailing_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\\r\\n\\x00\\x01]{0,100}").expect("valid regex")
}

fn line_strategy() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(tag_strategy(), 0..4),
        prop::option::of(source_strategy()),
        command_strategy(),
        prop::collection::vec(middle_strategy(), 0..=MAX_MIDDLE_PARAMS),
        prop::option::of(trailing_strategy()),
    )
        .prop_map(|(tags, source, command, middles, trailing)| {
            let mut line = String::new();
            if !tags.is_empty() {
                line.push('@');
                line.push_str(&tags.join(";"));
                line.push(' ');
            }
            if let Some(source) = source {
                line.push(':');
                line.push_str(&source);
                line.push(' ');
            }
            line.push_str(&command);
            for middle in middles {
                line.push(' ');
                line.push_str(&middle);
            }
            if let Some(trailing) = trailing {
                line.push_str(" :");
                line.push_str(&trailing);
            }
            line
        })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Parsing arbitrary text either succeeds or reports a malformed line.
    #[test]
    fn parse_never_panics(line in any::<String>()) {
        let _ = Message::parse("fuzz", &line);
    }

    /// parse → serialize reproduces the original bytes.
    #[test]
    fn line_roundtrip_is_exact(line in line_strategy()) {
        let msg = Message::parse("test", &line).expect("generated line should parse");
        prop_assert_eq!(msg.to_string(), format!("{}\r\n", line));

        let reparsed = Message::parse("test", &msg.to_string()).expect("output should parse");
        prop_assert_eq!(msg, reparsed);
    }

    /// A CTCP payload built from a type and body splits back into them.
    #[test]
    fn ctcp_codec_inverse(
        kind in "[A-Z]{1,10}",
        body in prop::option::of("[^\\x01\\r\\n\\x00]{0,40}"),
    ) {
        let payload = construct_ctcp(&kind, body.as_deref());
        let (parsed_kind, params) = parse_ctcp(&payload).expect("framed payload");
        prop_assert_eq!(parsed_kind, kind.as_str());
        let expected: Vec<&str> = body.as_deref().into_iter().collect();
        prop_assert_eq!(params, expected);
    }

    /// A glob without wildcards is an exact match, whatever characters it holds.
    #[test]
    fn literal_glob_is_exact(spec in "[^*]{0,20}", other in "[^*]{0,20}") {
        let glob = Matcher::glob(&spec).expect("escaped glob compiles");
        prop_assert!(glob.matches(&spec));
        prop_assert_eq!(glob.matches(&other), spec == other);
    }

    /// `*` matches every single-line token.
    #[test]
    fn star_glob_matches_everything(token in "[^\\r\\n]{0,50}") {
        prop_assert!(Matcher::glob("*").unwrap().matches(&token));
    }

    /// Patterns longer than the token list never match; wildcard-only
    /// patterns no longer than it always do.
    #[test]
    fn positional_length_rules(
        tokens in prop::collection::vec("[a-z]{0,5}", 0..6),
        extra in 1usize..4,
    ) {
        let too_long: Vec<Option<Matcher>> = (0..tokens.len() + extra).map(|_| None).collect();
        prop_assert!(!match_positions(&too_long, &tokens));

        for len in 0..=tokens.len() {
            let wildcards: Vec<Option<Matcher>> = (0..len).map(|_| None).collect();
            prop_assert!(match_positions(&wildcards, &tokens));
        }
    }
}
