//! Fuzz target for PDS4 label parsing.
//!
//! Tests that label parsing handles arbitrary input without panicking.
//! Labels come from external data providers and may be malformed.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(xml) = std::str::from_utf8(data) {
        // Should never panic, only return an error for bad input
        let _ = aipack_label::parse_label_str(xml);
    }
});
