//! Mock adapters for integration tests.
//!
//! [`MockLink`] scripts inbound lines and records every outbound one;
//! [`RecordingSink`] keeps every emitted event.

use std::collections::VecDeque;
use std::time::Duration;

use tankmon::app::events::{AppEvent, Reading};
use tankmon::app::ports::{EventSink, LineTransport};
use tankmon::error::CommsError;
use tankmon::link::codec::{self, Line};

// ── MockLink ──────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLink {
    pub inbound: VecDeque<String>,
    pub sent: Vec<String>,
    pub ack_timeouts: Vec<Duration>,
    /// When set, every send fails with `NotAcknowledged`.
    pub fail_sends: bool,
    pub receive_polls: usize,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&mut self, line: &str) {
        self.inbound.push_back(line.to_string());
    }

    /// Parsed copy of the `i`th telemetry line.
    pub fn reading(&self, i: usize) -> Reading {
        codec::decode_reading(&self.sent[i]).expect("well-formed telemetry line")
    }

    pub fn last_reading(&self) -> Reading {
        self.reading(self.sent.len() - 1)
    }
}

impl LineTransport for MockLink {
    fn send(&mut self, line: &str, ack_timeout: Duration) -> Result<(), CommsError> {
        self.ack_timeouts.push(ack_timeout);
        if self.fail_sends {
            return Err(CommsError::NotAcknowledged);
        }
        self.sent.push(line.to_string());
        Ok(())
    }

    fn try_receive(&mut self) -> Option<Line> {
        self.receive_polls += 1;
        let text = self.inbound.pop_front()?;
        let mut line = Line::new();
        line.push_str(&text).ok()?;
        Some(line)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
