//! Text-line telemetry codec.
//!
//! Wire format, one line per sample tick (device → app):
//! ```text
//! <instant_rate>,<average_rate>,<remaining_fraction>,<time_to_empty>\n
//!     13.50     ,     -1      ,       0.93        ,      -1
//! ```
//! Rates are mL/s and the fraction is 0..1, all fixed-point with two
//! decimals; time-to-empty is whole seconds.  A value that cannot be
//! computed this tick is sent as the literal `-1`.
//!
//! Commands (app → device):
//! ```text
//! RT:<ml>\n   refill to <ml>
//! RW:<ml>\n   refill with <ml> on top of what is left
//! RST\n       back to the start-up volume
//! ```
//! Anything else is ignored.
//!
//! [`LineDecoder`] frames a raw byte stream into lines for byte-oriented
//! transports.  It accumulates across reads, so a single read may carry
//! part of a line or several lines.

use core::fmt::{self, Write};

use log::warn;

use crate::app::commands::Command;
use crate::app::events::Reading;
use crate::error::CommsError;

/// Capacity of a [`Line`].  Outbound lines carry their `\n` within it;
/// inbound bodies may use all of it since the terminator is not stored.
pub const MAX_LINE_LEN: usize = 64;

/// One line of link traffic.
pub type Line = heapless::String<MAX_LINE_LEN>;

/// Literal sent for an unknown rate or time-to-empty.
pub const UNKNOWN: &str = "-1";

const REFILL_TO_PREFIX: &str = "RT:";
const REFILL_WITH_PREFIX: &str = "RW:";
const RESET_COMMAND: &str = "RST";

/// How refill amounts are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// `atof` semantics: the longest leading number, or 0 when there is
    /// none.  `RT:abc` is a refill to 0 mL.  Matches deployed apps.
    #[default]
    Lenient,
    /// The whole amount must be a finite, non-negative number.
    Strict,
}

// ── Telemetry (device → app) ──────────────────────────────────

/// Encode a reading as a terminated telemetry line.
pub fn encode_reading(reading: &Reading) -> Result<Line, CommsError> {
    let mut line = Line::new();
    write_reading(&mut line, reading).map_err(|_| CommsError::LineTooLong)?;
    Ok(line)
}

fn write_reading(out: &mut impl Write, r: &Reading) -> fmt::Result {
    write!(out, "{:.2},", r.instant_rate_ml_s)?;
    match r.average_rate_ml_s {
        Some(rate) => write!(out, "{:.2}", rate)?,
        None => out.write_str(UNKNOWN)?,
    }
    write!(out, ",{:.2},", r.remaining_fraction)?;
    match r.time_to_empty_s {
        Some(secs) => write!(out, "{}", secs)?,
        None => out.write_str(UNKNOWN)?,
    }
    out.write_char('\n')
}

/// Parse a telemetry line on the receiving side.
///
/// Exactly four comma-separated fields; `-1` maps back to unknown.  Any
/// malformed field rejects the whole line.
pub fn decode_reading(line: &str) -> Option<Reading> {
    let mut fields = line.trim().split(',');
    let instant = parse_finite(fields.next()?)?;
    let average = parse_finite(fields.next()?)?;
    let fraction = parse_finite(fields.next()?)?;
    let tte: i64 = fields.next()?.trim().parse().ok()?;
    if fields.next().is_some() {
        return None;
    }

    let average_rate_ml_s = if average == -1.0 { None } else { Some(average) };
    let time_to_empty_s = match tte {
        -1 => None,
        secs => Some(u32::try_from(secs).ok()?),
    };

    Some(Reading {
        instant_rate_ml_s: instant,
        average_rate_ml_s,
        remaining_fraction: fraction,
        time_to_empty_s,
    })
}

fn parse_finite(field: &str) -> Option<f32> {
    field.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

// ── Commands (app → device) ───────────────────────────────────

/// Decode an inbound line.  `None` for anything that is not a command.
pub fn decode_command(line: &str, mode: ParseMode) -> Option<Command> {
    let line = line.trim();
    if let Some(amount) = line.strip_prefix(REFILL_TO_PREFIX) {
        return parse_amount(amount, mode).map(Command::RefillTo);
    }
    if let Some(amount) = line.strip_prefix(REFILL_WITH_PREFIX) {
        return parse_amount(amount, mode).map(Command::RefillWith);
    }
    if line == RESET_COMMAND {
        return Some(Command::Reset);
    }
    None
}

/// Build a command line on the sending side.  Amounts go out as whole mL.
pub fn encode_command(cmd: &Command) -> Result<Line, CommsError> {
    let mut line = Line::new();
    let result = match cmd {
        Command::RefillTo(ml) => writeln!(line, "{}{}", REFILL_TO_PREFIX, whole_ml(*ml)),
        Command::RefillWith(ml) => writeln!(line, "{}{}", REFILL_WITH_PREFIX, whole_ml(*ml)),
        Command::Reset => writeln!(line, "{}", RESET_COMMAND),
    };
    result.map_err(|_| CommsError::LineTooLong)?;
    Ok(line)
}

fn whole_ml(ml: f32) -> u32 {
    // Float-to-int `as` saturates; NaN becomes 0.
    ml.trunc() as u32
}

fn parse_amount(text: &str, mode: ParseMode) -> Option<f32> {
    match mode {
        ParseMode::Lenient => {
            let value = parse_leading_f32(text).unwrap_or(0.0);
            Some(if value.is_finite() { value.max(0.0) } else { 0.0 })
        }
        ParseMode::Strict => text
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0),
    }
}

/// `atof`-style parse: the longest leading decimal number, if any.
fn parse_leading_f32(text: &str) -> Option<f32> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digits += frac_end - (end + 1);
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

// ── Streaming line framing ────────────────────────────────────

/// Decoder state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Accumulating bytes of the current line.
    Collecting,
    /// Current line overflowed the buffer; skipping to the next `\n`.
    Discarding,
}

/// Streaming newline decoder.
///
/// A `\r` is held back until the next byte so that the `\r\n` terminator
/// never counts against the line buffer.
pub struct LineDecoder {
    state: DecoderState,
    buf: heapless::Vec<u8, MAX_LINE_LEN>,
    pending_cr: bool,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Collecting,
            buf: heapless::Vec::new(),
            pending_cr: false,
        }
    }

    /// Feed one byte.  Returns a line (without `\r\n`) when `byte` ends it.
    /// Empty, oversized and non-UTF-8 lines are dropped.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        match self.state {
            DecoderState::Discarding => {
                if byte == b'\n' {
                    self.state = DecoderState::Collecting;
                }
                None
            }
            DecoderState::Collecting if byte == b'\n' => {
                self.pending_cr = false;
                let line = self.take_line();
                self.buf.clear();
                line
            }
            DecoderState::Collecting => {
                if core::mem::take(&mut self.pending_cr) && !self.collect(b'\r') {
                    return None;
                }
                if byte == b'\r' {
                    self.pending_cr = true;
                } else {
                    self.collect(byte);
                }
                None
            }
        }
    }

    /// Feed a chunk, handing every completed line to `on_line` in order.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(Line)) {
        for &byte in data {
            if let Some(line) = self.push(byte) {
                on_line(line);
            }
        }
    }

    /// Drop any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.pending_cr = false;
        self.state = DecoderState::Collecting;
    }

    /// Append a body byte; on overflow drop the line and skip to `\n`.
    fn collect(&mut self, byte: u8) -> bool {
        if self.buf.push(byte).is_ok() {
            return true;
        }
        warn!("link: inbound line exceeds {} bytes, dropped", MAX_LINE_LEN);
        self.buf.clear();
        self.pending_cr = false;
        self.state = DecoderState::Discarding;
        false
    }

    fn take_line(&self) -> Option<Line> {
        if self.buf.is_empty() {
            return None;
        }
        let text = core::str::from_utf8(&self.buf).ok()?;
        let mut line = Line::new();
        line.push_str(text).ok()?;
        Some(line)
    }
}
