//! Per-tick consumption estimate.
//!
//! Converts the pulses counted during one sample interval into a volume
//! delta, updates the [`TankState`], and derives the [`Reading`].  Every
//! degenerate case (empty tank, no baseline yet, zero elapsed seconds,
//! non-positive average) produces an `unknown` rather than a division.

use crate::config::MonitorConfig;
use crate::sensors::flow::{PulseAccumulator, PulseCount};

use super::events::Reading;
use super::tank::TankState;

/// Result of one tick, before encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Pulses drained for this interval.
    pub pulse_count: PulseCount,
    /// Volume those pulses represent (mL).
    pub consumed_ml: f32,
    /// The reported values.
    pub reading: Reading,
}

/// Stateless converter from pulses to readings.
#[derive(Debug, Clone, Copy)]
pub struct ConsumptionSampler {
    ml_per_pulse: f32,
    interval_secs: f32,
}

impl ConsumptionSampler {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            ml_per_pulse: config.ml_per_pulse,
            interval_secs: config.sample_interval_ms as f32 / 1000.0,
        }
    }

    /// Volume represented by `pulses` (mL).
    pub fn consumed_ml(&self, pulses: PulseCount) -> f32 {
        pulses as f32 * self.ml_per_pulse
    }

    /// Drain the accumulator and run one tick against `tank`.
    pub fn sample(&self, pulses: &PulseAccumulator, tank: &mut TankState, now_ms: u64) -> Sample {
        self.apply(pulses.drain(), tank, now_ms)
    }

    /// Run one tick with an already-drained pulse count.
    pub fn apply(&self, pulse_count: PulseCount, tank: &mut TankState, now_ms: u64) -> Sample {
        let consumed_ml = self.consumed_ml(pulse_count);
        tank.consume(consumed_ml);

        let reading = if tank.is_empty() {
            Reading::empty()
        } else {
            self.active_reading(consumed_ml, tank, now_ms)
        };

        Sample {
            pulse_count,
            consumed_ml,
            reading,
        }
    }

    fn active_reading(&self, consumed_ml: f32, tank: &mut TankState, now_ms: u64) -> Reading {
        let instant_rate_ml_s = if self.interval_secs > 0.0 {
            consumed_ml / self.interval_secs
        } else {
            0.0
        };
        let remaining_fraction = tank.remaining_fraction();

        let average_rate_ml_s = match tank.elapsed_secs_or_mark(now_ms) {
            None | Some(0) => None,
            Some(elapsed_s) => Some(tank.consumed_since_refill_ml() / elapsed_s as f32),
        };

        let time_to_empty_s = average_rate_ml_s
            .filter(|rate| *rate > 0.0)
            .map(|rate| (tank.current_volume_ml() / rate).floor() as u32);

        Reading {
            instant_rate_ml_s,
            average_rate_ml_s,
            remaining_fraction,
            time_to_empty_s,
        }
    }
}
