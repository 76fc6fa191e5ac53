//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (ESP-IDF console on the device, stderr on the host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// `-1` for unknown values, matching the wire format.
fn or_unknown<T: core::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-1".to_string(), |v| v.to_string())
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Reading(r) => {
                info!(
                    "TELEM | rate={:.2}ml/s | avg={}ml/s | remaining={:.0}% | tte={}s",
                    r.instant_rate_ml_s,
                    or_unknown(r.average_rate_ml_s.map(|v| format!("{:.2}", v))),
                    r.remaining_fraction * 100.0,
                    or_unknown(r.time_to_empty_s),
                );
            }
            AppEvent::Emptied => {
                info!("EMPTY | tank ran dry");
            }
            AppEvent::Refilled { command, volume_ml } => {
                info!("REFILL | {:?} -> {:.2} ml", command, volume_ml);
            }
            AppEvent::DeliveryFailed { tick } => {
                warn!("LINK | tick {} telemetry dropped", tick);
            }
            AppEvent::Started { volume_ml } => {
                info!("START | volume={:.2} ml", volume_ml);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::commands::Command;
    use crate::app::events::Reading;

    #[test]
    fn unknown_formats_as_sentinel() {
        assert_eq!(or_unknown::<u32>(None), "-1");
        assert_eq!(or_unknown(Some(8u32)), "8");
    }

    #[test]
    fn every_event_is_accepted() {
        let mut sink = LogEventSink::new();
        sink.emit(&AppEvent::Started { volume_ml: 200.0 });
        sink.emit(&AppEvent::Reading(Reading::empty()));
        sink.emit(&AppEvent::Emptied);
        sink.emit(&AppEvent::Refilled {
            command: Command::Reset,
            volume_ml: 200.0,
        });
        sink.emit(&AppEvent::DeliveryFailed { tick: 3 });
    }
}
