//! Application service, the hexagonal core.
//!
//! [`MonitorService`] owns the tank model, the sampler, the command handler
//! and the tick scheduler.  All I/O flows through port traits injected at
//! call sites, so the whole service runs against mock adapters in tests.
//!
//! ```text
//!  PulseAccumulator ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                       │      MonitorService       │
//!   LineTransport  ◀──▶ │ Sampler · Tank · Handler  │
//!                       └──────────────────────────┘
//! ```
//!
//! One tick, in order: drain pulses and update the tank, send the
//! telemetry line (bounded ack wait), then take at most one inbound line
//! and apply it if it is a command.

use core::time::Duration;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::link::codec::{self, ParseMode};
use crate::scheduler::Scheduler;
use crate::sensors::flow::PulseAccumulator;

use super::commands::Command;
use super::events::{AppEvent, Reading};
use super::handler::CommandHandler;
use super::ports::{EventSink, LineTransport};
use super::sampler::{ConsumptionSampler, Sample};
use super::tank::TankState;

/// Outcome of one tick, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub sample: Sample,
    /// The telemetry line was acknowledged by the transport.
    pub delivered: bool,
    /// Command applied at the end of this tick, if any.
    pub command: Option<Command>,
}

// ───────────────────────────────────────────────────────────────
// MonitorService
// ───────────────────────────────────────────────────────────────

/// Orchestrates sampling, telemetry and refill commands.
pub struct MonitorService {
    config: MonitorConfig,
    tank: TankState,
    sampler: ConsumptionSampler,
    handler: CommandHandler,
    scheduler: Scheduler,
    pulses: Arc<PulseAccumulator>,
    parse_mode: ParseMode,
    ack_timeout: Duration,
    tick_count: u64,
    delivery_failures: u64,
}

impl MonitorService {
    /// Build the service.  Does not start ticking; call [`start`](Self::start).
    pub fn new(config: MonitorConfig, pulses: Arc<PulseAccumulator>) -> Self {
        Self {
            tank: TankState::new(config.initial_volume_ml),
            sampler: ConsumptionSampler::new(&config),
            handler: CommandHandler::new(config.initial_volume_ml),
            scheduler: Scheduler::new(config.sample_interval_ms),
            parse_mode: config.parse_mode(),
            ack_timeout: Duration::from_millis(u64::from(config.ack_timeout_ms)),
            pulses,
            config,
            tick_count: 0,
            delivery_failures: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the periodic schedule; the first tick is one interval from `now_ms`.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        let stale = self.pulses.drain();
        if stale > 0 {
            debug!("MonitorService: discarded {} pulses from before start", stale);
        }
        self.scheduler.start(now_ms);
        sink.emit(&AppEvent::Started {
            volume_ml: self.tank.current_volume_ml(),
        });
        info!(
            "MonitorService started: {:.2} ml, every {} ms",
            self.tank.current_volume_ml(),
            self.scheduler.interval_ms()
        );
    }

    /// Stop ticking.  Pulses keep accumulating and land in the next tick.
    pub fn stop(&mut self) {
        self.scheduler.stop();
        info!(
            "MonitorService stopped after {} ticks ({} skipped)",
            self.tick_count,
            self.scheduler.skipped()
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run a tick if one is due at `now_ms`.
    pub fn poll(
        &mut self,
        now_ms: u64,
        link: &mut impl LineTransport,
        sink: &mut impl EventSink,
    ) -> Option<TickReport> {
        if self.scheduler.poll(now_ms) {
            Some(self.tick(now_ms, link, sink))
        } else {
            None
        }
    }

    /// Run one full tick unconditionally.
    pub fn tick(
        &mut self,
        now_ms: u64,
        link: &mut impl LineTransport,
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.tick_count += 1;
        let was_empty = self.tank.is_empty();

        // 1. Pulses → tank → reading
        let sample = self.sampler.sample(&self.pulses, &mut self.tank, now_ms);
        sink.emit(&AppEvent::Reading(sample.reading));
        if !was_empty && self.tank.is_empty() {
            info!("Tank empty after {} ticks", self.tick_count);
            sink.emit(&AppEvent::Emptied);
        }

        // 2. Telemetry, best effort
        let delivered = self.deliver(&sample.reading, link, sink);

        // 3. At most one inbound line
        let command = self.poll_command(now_ms, link, sink);

        TickReport {
            sample,
            delivered,
            command,
        }
    }

    /// Apply a command outside the tick path (e.g. from a local button).
    ///
    /// The schedule is stopped around the refill and, if it was running,
    /// restarted from `now_ms`.
    pub fn apply_command(&mut self, cmd: Command, now_ms: u64, sink: &mut impl EventSink) -> f32 {
        let was_running = self.scheduler.is_running();
        self.scheduler.stop();
        let volume_ml = self.handler.apply(cmd, &mut self.tank);
        if was_running {
            self.scheduler.start(now_ms);
        }
        sink.emit(&AppEvent::Refilled {
            command: cmd,
            volume_ml,
        });
        volume_ml
    }

    fn deliver(
        &mut self,
        reading: &Reading,
        link: &mut impl LineTransport,
        sink: &mut impl EventSink,
    ) -> bool {
        let result = codec::encode_reading(reading)
            .and_then(|line| link.send(&line, self.ack_timeout));
        match result {
            Ok(()) => true,
            Err(e) => {
                self.delivery_failures += 1;
                warn!("Link: tick {} telemetry not delivered: {}", self.tick_count, e);
                sink.emit(&AppEvent::DeliveryFailed {
                    tick: self.tick_count,
                });
                false
            }
        }
    }

    fn poll_command(
        &mut self,
        now_ms: u64,
        link: &mut impl LineTransport,
        sink: &mut impl EventSink,
    ) -> Option<Command> {
        let line = link.try_receive()?;
        match codec::decode_command(&line, self.parse_mode) {
            Some(cmd) => {
                self.apply_command(cmd, now_ms, sink);
                Some(cmd)
            }
            None => {
                debug!("Link: ignoring inbound line {:?}", line.as_str());
                None
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn tank(&self) -> &TankState {
        &self.tank
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures
    }

    /// Ticks dropped because `poll` was called more than one interval late.
    pub fn skipped_ticks(&self) -> u64 {
        self.scheduler.skipped()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Time until the next scheduled tick; `None` while stopped.
    pub fn ms_until_next_tick(&self, now_ms: u64) -> Option<u64> {
        self.scheduler.ms_until_due(now_ms)
    }
}
