//! Application core: pure domain logic, zero I/O.
//!
//! Tank bookkeeping, the pulse-to-reading computation and refill command
//! handling.  All interaction with the radio link and the log happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod handler;
pub mod ports;
pub mod sampler;
pub mod service;
pub mod tank;
