//! Pulse sources.
//!
//! [`flow`] holds the accumulator shared between the pulse source and the
//! sample tick.  On the device the GPIO ISR feeds it
//! (see `drivers::hw_init`); on the host [`sim`] does.

pub mod flow;
pub mod sim;

pub use flow::{PulseAccumulator, PulseCount};
pub use sim::{SimHandle, SimProfile, SimulatedPulseSource};
