//! Synthetic pulse source for the host simulator.
//!
//! Stands in for the flow sensor ISR: a background thread adds a burst of
//! pulses to the same [`PulseAccumulator`] every `period_ms`, so the
//! sampler, codec and link run unchanged against simulated consumption.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::flow::{PulseAccumulator, PulseCount};

/// Shape of the simulated consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimProfile {
    /// Pulses added per burst.
    pub burst_pulses: PulseCount,
    /// Time between bursts (milliseconds).
    pub period_ms: u32,
}

impl Default for SimProfile {
    /// 15 pulses every 512 ms: about 2 mL per burst at 0.135 mL/pulse.
    fn default() -> Self {
        Self {
            burst_pulses: 15,
            period_ms: 512,
        }
    }
}

/// Generates pulses on a timer.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPulseSource {
    profile: SimProfile,
}

impl SimulatedPulseSource {
    pub fn new(profile: SimProfile) -> Self {
        Self { profile }
    }

    /// Add one burst to the accumulator.
    pub fn emit(&self, pulses: &PulseAccumulator) {
        pulses.add(self.profile.burst_pulses);
    }

    /// Run bursts on a background thread until the handle is stopped.
    pub fn spawn(self, pulses: Arc<PulseAccumulator>) -> SimHandle {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let period = Duration::from_millis(u64::from(self.profile.period_ms));

        info!(
            "sim: {} pulses every {} ms",
            self.profile.burst_pulses, self.profile.period_ms
        );

        let thread = thread::spawn(move || {
            while flag.load(Ordering::Acquire) {
                thread::sleep(period);
                self.emit(&pulses);
            }
            debug!("sim: pulse source stopped");
        });

        SimHandle {
            running,
            thread: Some(thread),
        }
    }
}

/// Owner of a running simulated source.  Dropping it stops the thread.
pub struct SimHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SimHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the generator and wait for its thread to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for SimHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
