//! Fuzz target for IRC line parsing
//!
//! Feeds arbitrary lines to the parser and checks that anything it accepts
//! serializes to a line that parses back to the same message.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_hooks::Message;
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    let Ok(input) = str::from_utf8(data) else {
        return;
    };
    if input.len() > 8191 {
        return;
    }

    let Ok(msg) = Message::parse("fuzz", input) else {
        return;
    };

    // Serialization should never panic, and its output should be stable.
    let wire = msg.to_string();
    if let Ok(reparsed) = Message::parse("fuzz", &wire) {
        assert_eq!(wire, reparsed.to_string());
    }
});
