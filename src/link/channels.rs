//! Inbound line channel.
//!
//! Bridges a blocking reader thread (stdin on the host simulator) with the
//! sample loop, which only ever polls.  Bounded; when the loop falls behind
//! the reader drops lines rather than blocking.
//!
//! ```text
//! ┌───────────────┐    Line    ┌──────────────┐
//! │ Reader thread │──────────▶│  Sample loop  │
//! │  (blocking)   │            │  (try_receive)│
//! └───────────────┘            └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::codec::Line;

/// Lines buffered between reader and loop.  The loop takes one per tick.
pub const INBOUND_DEPTH: usize = 4;

/// Channel type for inbound lines.
pub type InboundLines = Channel<CriticalSectionRawMutex, Line, INBOUND_DEPTH>;

/// Process-wide inbound channel used by the console transport.
pub static INBOUND_LINES: InboundLines = Channel::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_and_fifo() {
        let ch = InboundLines::new();
        for i in 0..INBOUND_DEPTH {
            let mut line = Line::new();
            line.push_str(if i % 2 == 0 { "RST" } else { "RT:1" }).unwrap();
            assert!(ch.try_send(line).is_ok());
        }
        assert!(ch.try_send(Line::new()).is_err());

        assert_eq!(ch.try_receive().unwrap().as_str(), "RST");
        assert_eq!(ch.try_receive().unwrap().as_str(), "RT:1");
    }
}
