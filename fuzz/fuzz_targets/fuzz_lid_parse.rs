//! Fuzz target for LID parsing.

#![no_main]

use aipack_common::{Lid, Vid};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(lid) = Lid::parse(data) {
        // Accessors must be total on accepted input
        let _ = (lid.bundle(), lid.collection(), lid.mission());
    }
    let _ = Vid::parse(data);
});
