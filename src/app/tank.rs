//! Tank volume bookkeeping.
//!
//! ```text
//!              consume until current == 0
//!   ┌────────┐ ─────────────────────────▶ ┌───────┐
//!   │ Active │                            │ Empty │
//!   └────────┘ ◀───────────────────────── └───────┘
//!                   refill (> 0 mL)
//! ```
//!
//! A refill to 0 mL lands in Empty straight away.
//!
//! A refill clears the rate baseline; the next sample tick re-establishes
//! it.  Until then the average rate is unknown.

/// Derived lifecycle phase of the tank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankPhase {
    /// Liquid remains (`current_volume_ml > 0`).
    Active,
    /// Nothing left to dispense until the next refill.
    Empty,
}

/// Estimation state for the single monitored tank.
#[derive(Debug, Clone, PartialEq)]
pub struct TankState {
    /// Volume at the last refill (mL).
    initial_volume_ml: f32,
    /// Volume left (mL).  Never below zero.
    current_volume_ml: f32,
    /// Monotonic time (ms) the average rate is measured from.
    baseline_ms: Option<u64>,
}

impl TankState {
    /// A freshly filled tank.  Negative or non-finite volumes are treated as 0.
    pub fn new(volume_ml: f32) -> Self {
        let volume = sanitize_volume(volume_ml);
        Self {
            initial_volume_ml: volume,
            current_volume_ml: volume,
            baseline_ms: None,
        }
    }

    pub fn initial_volume_ml(&self) -> f32 {
        self.initial_volume_ml
    }

    pub fn current_volume_ml(&self) -> f32 {
        self.current_volume_ml
    }

    pub fn baseline_ms(&self) -> Option<u64> {
        self.baseline_ms
    }

    pub fn phase(&self) -> TankPhase {
        if self.current_volume_ml <= 0.0 {
            TankPhase::Empty
        } else {
            TankPhase::Active
        }
    }

    pub fn is_empty(&self) -> bool {
        self.phase() == TankPhase::Empty
    }

    /// Remove `consumed_ml` from the tank, clamping at zero.
    /// Returns the new volume.
    pub fn consume(&mut self, consumed_ml: f32) -> f32 {
        self.current_volume_ml = (self.current_volume_ml - consumed_ml.max(0.0)).max(0.0);
        self.current_volume_ml
    }

    /// Share of the last fill still in the tank, in `[0, 1]`.
    pub fn remaining_fraction(&self) -> f32 {
        if self.initial_volume_ml <= 0.0 {
            return 0.0;
        }
        (self.current_volume_ml / self.initial_volume_ml).clamp(0.0, 1.0)
    }

    /// Volume dispensed since the last refill (mL).
    pub fn consumed_since_refill_ml(&self) -> f32 {
        self.initial_volume_ml - self.current_volume_ml
    }

    /// Whole seconds since the baseline, truncated.  Establishes the
    /// baseline at `now_ms` (and returns `None`) if there is none yet.
    pub fn elapsed_secs_or_mark(&mut self, now_ms: u64) -> Option<u64> {
        match self.baseline_ms {
            Some(start) => Some(now_ms.saturating_sub(start) / 1000),
            None => {
                self.baseline_ms = Some(now_ms);
                None
            }
        }
    }

    /// Reset to a freshly filled tank holding `volume_ml`.
    pub fn refill_to(&mut self, volume_ml: f32) {
        *self = Self::new(volume_ml);
    }
}

fn sanitize_volume(volume_ml: f32) -> f32 {
    if volume_ml.is_finite() {
        volume_ml.max(0.0)
    } else {
        0.0
    }
}
