//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log, a display, test recorder).

use super::commands::Command;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started with the configured fill.
    Started { volume_ml: f32 },

    /// Periodic consumption reading (one per tick).
    Reading(Reading),

    /// The tank just ran dry.  Emitted once per Active → Empty transition.
    Emptied,

    /// A refill-type command was applied.
    Refilled { command: Command, volume_ml: f32 },

    /// A telemetry line was not acknowledged by the transport.
    DeliveryFailed { tick: u64 },
}

/// One tick's worth of reported values.
///
/// `None` means "not computable this tick" and goes out on the wire as `-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Consumption during just this interval (mL/s).
    pub instant_rate_ml_s: f32,
    /// Consumption averaged since the last refill (mL/s).
    pub average_rate_ml_s: Option<f32>,
    /// Share of the last fill remaining, in `[0, 1]`.
    pub remaining_fraction: f32,
    /// Projected seconds until empty at the average rate.
    pub time_to_empty_s: Option<u32>,
}

impl Reading {
    /// What an empty tank reports.
    pub const fn empty() -> Self {
        Self {
            instant_rate_ml_s: 0.0,
            average_rate_ml_s: None,
            remaining_fraction: 0.0,
            time_to_empty_s: None,
        }
    }
}
