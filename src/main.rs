//! TankMon firmware entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  UartLineTransport / ConsoleTransport   LogEventSink         │
//! │  (LineTransport, LED-indicated)         (EventSink)          │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            MonitorService (pure logic)                 │  │
//! │  │  Scheduler · Sampler · TankState · CommandHandler      │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                          ▲                                   │
//! │        PulseAccumulator (flow ISR / simulator thread)        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::info;

use tankmon::adapters::log_sink::LogEventSink;
use tankmon::adapters::time::MonotonicClock;
use tankmon::app::ports::{EventSink, LineTransport};
use tankmon::app::service::MonitorService;
use tankmon::config::MonitorConfig;
use tankmon::drivers::activity_led::{GpioOutput, IndicatingTransport};
use tankmon::drivers::hw_init;
use tankmon::pins;
use tankmon::sensors::flow::PulseAccumulator;

#[cfg(not(target_os = "espidf"))]
use clap::Parser;
#[cfg(not(target_os = "espidf"))]
use std::path::PathBuf;

// ── Host command line ─────────────────────────────────────────

/// Host simulator: simulated flow pulses, telemetry on stdout, commands on stdin.
#[cfg(not(target_os = "espidf"))]
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults are used if it is missing or unreadable
    config: Option<PathBuf>,

    /// Override the sample interval (ms)
    #[arg(long)]
    sample_interval_ms: Option<u32>,

    /// Override the start-up volume (ml)
    #[arg(long)]
    initial_volume_ml: Option<f32>,

    /// Ignore refill commands with a malformed amount instead of reading them as 0
    #[arg(long)]
    strict: bool,
}

#[cfg(not(target_os = "espidf"))]
impl Cli {
    /// Config file (or defaults) with command-line overrides applied, validated.
    fn monitor_config(&self) -> tankmon::error::Result<MonitorConfig> {
        let mut config = MonitorConfig::load_or_default(self.config.as_deref());
        if let Some(ms) = self.sample_interval_ms {
            config.sample_interval_ms = ms;
        }
        if let Some(ml) = self.initial_volume_ml {
            config.initial_volume_ml = ml;
        }
        if self.strict {
            config.strict_command_parsing = true;
        }
        config.validate()?;
        Ok(config)
    }
}

// ── Main ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    banner();

    // ── 2. Config (compiled-in defaults) ──────────────────────
    let config = MonitorConfig::default();
    config.validate().map_err(tankmon::error::Error::from)?;

    // ── 3. Hardware ───────────────────────────────────────────
    let pulses = Arc::new(PulseAccumulator::new());
    hw_init::init_flow_isr(pulses.clone())?;
    hw_init::init_activity_led()?;
    let uart = tankmon::adapters::uart::UartLineTransport::new(
        pins::RADIO_UART_PORT,
        pins::RADIO_UART_TX_GPIO,
        pins::RADIO_UART_RX_GPIO,
        pins::RADIO_UART_BAUD,
    )?;
    let mut link = IndicatingTransport::new(uart, GpioOutput::new(pins::ACTIVITY_LED_GPIO));

    // ── 4. Run ────────────────────────────────────────────────
    let mut service = MonitorService::new(config, pulses);
    run(&mut service, &mut link, &mut LogEventSink::new())
}

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    // ── 1. Host bootstrap ─────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    banner();

    // ── 2. Config: optional JSON file plus command-line overrides ──
    let config = Cli::parse().monitor_config()?;

    // ── 3. Simulated hardware ─────────────────────────────────
    let pulses = Arc::new(PulseAccumulator::new());
    hw_init::init_flow_isr(pulses.clone())?;
    hw_init::init_activity_led()?;
    let _sim = tankmon::sensors::sim::SimulatedPulseSource::new(config.simulation)
        .spawn(pulses.clone());
    let (console, _reader) = tankmon::adapters::console::ConsoleTransport::stdio()?;
    let mut link = IndicatingTransport::new(console, GpioOutput::new(pins::ACTIVITY_LED_GPIO));

    // ── 4. Run ────────────────────────────────────────────────
    let mut service = MonitorService::new(config, pulses);
    run(&mut service, &mut link, &mut LogEventSink::new())
}

fn banner() {
    info!("╔══════════════════════════════════════╗");
    info!("║  TankMon v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");
}

/// Sample loop.  Sleeps until the next tick is due, then polls.
fn run(
    service: &mut MonitorService,
    link: &mut impl LineTransport,
    sink: &mut impl EventSink,
) -> Result<()> {
    let clock = MonotonicClock::new();
    service.start(clock.now_ms(), sink);

    loop {
        service.poll(clock.now_ms(), link, sink);
        let wait_ms = service
            .ms_until_next_tick(clock.now_ms())
            .unwrap_or(u64::from(service.config().sample_interval_ms));
        std::thread::sleep(Duration::from_millis(wait_ms));
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_gives_defaults() {
        let cli = Cli::try_parse_from(["tankmon"]).unwrap();
        assert_eq!(cli.monitor_config().unwrap(), MonitorConfig::default());
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let cli = Cli::try_parse_from([
            "tankmon",
            "--sample-interval-ms",
            "2000",
            "--initial-volume-ml",
            "350",
            "--strict",
        ])
        .unwrap();
        let config = cli.monitor_config().unwrap();
        assert_eq!(config.sample_interval_ms, 2000);
        assert_eq!(config.initial_volume_ml, 350.0);
        assert!(config.strict_command_parsing);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let cli = Cli::try_parse_from(["tankmon", "/nonexistent/tankmon.json"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/nonexistent/tankmon.json")));
        assert_eq!(cli.monitor_config().unwrap(), MonitorConfig::default());
    }

    #[test]
    fn invalid_override_is_rejected() {
        // Default ack timeout is 250 ms, which must be shorter than the interval.
        let cli = Cli::try_parse_from(["tankmon", "--sample-interval-ms", "100"]).unwrap();
        assert!(matches!(
            cli.monitor_config(),
            Err(tankmon::error::Error::Config(_))
        ));
    }
}
