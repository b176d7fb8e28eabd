//! Fuzz target for the CTCP codec

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_hooks::ctcp::{construct_ctcp, is_ctcp, parse_ctcp};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = str::from_utf8(data) else {
        return;
    };

    if let Some((kind, params)) = parse_ctcp(input) {
        assert!(is_ctcp(input));
        assert!(!kind.is_empty());
        // Rebuilding from the parts gives back the input.
        assert_eq!(construct_ctcp(kind, params.first().copied()), input);
    }
});
