//! Hall-effect flow sensor pulse accumulator.
//!
//! The sensor emits one pulse per fixed volume of liquid (calibrated as
//! `ml_per_pulse` in the config).  The GPIO ISR calls
//! [`PulseAccumulator::increment`] on each rising edge; the sample tick
//! calls [`PulseAccumulator::drain`] once per interval.
//!
//! The ISR and the main loop run at different priorities, so the counter is
//! an `AtomicU32`: increment is a CAS loop, drain is a single `swap(0)`.
//! A pulse landing between the two is counted in exactly one interval.
//!
//! Width: the fastest hall-effect flow sensors top out below 10 kHz, so a
//! 1 s interval needs fewer than 2^14 counts.  `u32` leaves ample headroom;
//! if it is ever exhausted the count saturates at `u32::MAX` rather than
//! wrapping to a small value.

use core::sync::atomic::{AtomicU32, Ordering};

/// Pulses counted since the last drain.
pub type PulseCount = u32;

/// Interrupt-safe pulse counter.
#[derive(Debug, Default)]
pub struct PulseAccumulator {
    count: AtomicU32,
}

impl PulseAccumulator {
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// Count one pulse.  Lock-free; safe to call from ISR context.
    pub fn increment(&self) {
        // `None` from the closure leaves a saturated counter untouched.
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |n| n.checked_add(1));
    }

    /// Count `n` pulses at once (simulated sources emit bursts).
    pub fn add(&self, n: PulseCount) {
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |c| {
                Some(c.saturating_add(n))
            });
    }

    /// Read the count and reset it to zero in one indivisible step.
    pub fn drain(&self) -> PulseCount {
        self.count.swap(0, Ordering::AcqRel)
    }

    /// Current count without resetting (diagnostics only).
    pub fn peek(&self) -> PulseCount {
        self.count.load(Ordering::Acquire)
    }
}
