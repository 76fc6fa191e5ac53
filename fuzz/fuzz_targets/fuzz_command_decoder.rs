//! Fuzz target: `decode_command` / `decode_reading`
//!
//! Arbitrary UTF-8 must never panic either parser, and any lenient refill
//! amount must be usable as a tank volume.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use tankmon::app::commands::Command;
use tankmon::link::codec::{ParseMode, decode_command, decode_reading};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    let _ = decode_reading(text);
    let _ = decode_command(text, ParseMode::Strict);
    match decode_command(text, ParseMode::Lenient) {
        Some(Command::RefillTo(v) | Command::RefillWith(v)) => {
            assert!(v.is_finite() && v >= 0.0);
        }
        Some(Command::Reset) | None => {}
    }
});
