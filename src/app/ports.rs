//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! The radio link and the event log are driven adapters.  The
//! [`MonitorService`](super::service::MonitorService) consumes them via
//! generics, so the domain core never touches a UART or a console directly.
//! The pulse source is not a port: it shares the
//! [`PulseAccumulator`](crate::sensors::flow::PulseAccumulator) instead.

use core::time::Duration;

use crate::error::CommsError;
use crate::link::codec::Line;

// ───────────────────────────────────────────────────────────────
// Line transport port (driven adapter: domain ↔ radio link)
// ───────────────────────────────────────────────────────────────

/// Bidirectional text-line link to the companion app.
pub trait LineTransport {
    /// Send one line (including its trailing `\n`) and wait at most
    /// `ack_timeout` for the link to acknowledge it.
    ///
    /// Best effort: an `Err` is a delivery failure for this line only.
    fn send(&mut self, line: &str, ack_timeout: Duration) -> Result<(), CommsError>;

    /// Non-blocking poll.  Returns at most one pending inbound line,
    /// without its terminator.
    fn try_receive(&mut self) -> Option<Line>;
}

impl<T: LineTransport + ?Sized> LineTransport for &mut T {
    fn send(&mut self, line: &str, ack_timeout: Duration) -> Result<(), CommsError> {
        (**self).send(line, ack_timeout)
    }

    fn try_receive(&mut self) -> Option<Line> {
        (**self).try_receive()
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
