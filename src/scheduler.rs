//! Fixed-interval sample scheduler.
//!
//! The main loop polls the scheduler with the current monotonic time; it
//! answers "is a tick due".  Stopping and restarting it brackets a refill,
//! so a command never lands inside a tick and the next tick comes one full
//! interval after the refill.
//!
//! ```text
//!   start(t0)        poll(t0+I) → true     stop()   start(t1)   poll(t1+I) → true
//!   ──┬──────────────────┬────────────────────┬────────┬────────────┬──────▶ time
//!     │◀──── interval ──▶│                    │        │◀─ interval ▶│
//! ```

use log::{debug, info};

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Periodic timer driven by polling.
#[derive(Debug, Clone)]
pub struct Scheduler {
    interval_ms: u64,
    /// Monotonic time of the next tick; `None` while stopped.
    next_due_ms: Option<u64>,
    /// Ticks skipped because the caller fell behind.
    skipped: u64,
}

impl Scheduler {
    /// A stopped scheduler.  `interval_ms` is floored at 1 ms.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms.max(1)),
            next_due_ms: None,
            skipped: 0,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// (Re)start; the first tick is due one interval after `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
        debug!("Scheduler: started, every {} ms", self.interval_ms);
    }

    /// Stop; `poll` returns `false` until the next `start`.
    pub fn stop(&mut self) {
        self.next_due_ms = None;
        debug!("Scheduler: stopped");
    }

    pub fn is_running(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Fire at most once.  If the caller is more than one interval late the
    /// missed ticks are dropped and the schedule realigns to `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        let Some(due) = self.next_due_ms else {
            return false;
        };
        if now_ms < due {
            return false;
        }

        let next = due + self.interval_ms;
        if now_ms >= next {
            let missed = (now_ms - due) / self.interval_ms;
            self.skipped += missed;
            info!("Scheduler: {} tick(s) late, realigning", missed);
            self.next_due_ms = Some(now_ms + self.interval_ms);
        } else {
            self.next_due_ms = Some(next);
        }
        true
    }

    /// Milliseconds until the next tick (0 if overdue, `None` while stopped).
    pub fn ms_until_due(&self, now_ms: u64) -> Option<u64> {
        self.next_due_ms.map(|due| due.saturating_sub(now_ms))
    }

    /// Total ticks dropped by realignment.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
