//! Wire-format tests from the app's side of the link: lines the device
//! emits must parse back, and lines the app builds must be accepted.

use tankmon::app::commands::Command;
use tankmon::app::events::Reading;
use tankmon::link::codec::{self, LineDecoder, ParseMode};

#[test]
fn app_command_builder_is_accepted_by_device() {
    for cmd in [Command::RefillTo(150.0), Command::RefillWith(40.0), Command::Reset] {
        let line = codec::encode_command(&cmd).unwrap();
        assert!(line.ends_with('\n'));
        for mode in [ParseMode::Lenient, ParseMode::Strict] {
            assert_eq!(codec::decode_command(&line, mode), Some(cmd));
        }
    }
}

#[test]
fn device_lines_parse_on_the_app_side() {
    let reading = Reading {
        instant_rate_ml_s: 6.75,
        average_rate_ml_s: Some(20.25),
        remaining_fraction: 0.89875,
        time_to_empty_s: Some(8),
    };
    let line = codec::encode_reading(&reading).unwrap();
    let back = codec::decode_reading(&line).unwrap();
    assert_eq!(back.instant_rate_ml_s, 6.75);
    assert_eq!(back.average_rate_ml_s, Some(20.25));
    assert!((back.remaining_fraction - 0.9).abs() < 0.006);
    assert_eq!(back.time_to_empty_s, Some(8));
}

#[test]
fn command_stream_over_a_byte_link() {
    let mut decoder = LineDecoder::new();
    let mut commands = Vec::new();
    for chunk in [&b"RT:15"[..], b"0\r\nhello\nR", b"ST\nRW:2.5\n"] {
        decoder.feed(chunk, |line| {
            if let Some(cmd) = codec::decode_command(&line, ParseMode::Lenient) {
                commands.push(cmd);
            }
        });
    }
    assert_eq!(
        commands,
        [Command::RefillTo(150.0), Command::Reset, Command::RefillWith(2.5)]
    );
}
