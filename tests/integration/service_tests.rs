//! Integration tests for the pulses → MonitorService → link pipeline.
//!
//! Time is driven explicitly; pulses are injected straight into the shared
//! accumulator the way the flow ISR would.

use std::sync::Arc;
use std::time::Duration;

use tankmon::app::commands::Command;
use tankmon::app::events::AppEvent;
use tankmon::app::service::MonitorService;
use tankmon::app::tank::TankPhase;
use tankmon::config::MonitorConfig;
use tankmon::sensors::flow::PulseAccumulator;

use super::mock_link::{MockLink, RecordingSink};

fn make_service(config: MonitorConfig) -> (MonitorService, Arc<PulseAccumulator>, MockLink, RecordingSink) {
    let pulses = Arc::new(PulseAccumulator::new());
    let mut svc = MonitorService::new(config, pulses.clone());
    let mut sink = RecordingSink::new();
    svc.start(0, &mut sink);
    (svc, pulses, MockLink::new(), sink)
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}

#[test]
fn two_tick_scenario_reports_rates_and_time_to_empty() {
    let (mut svc, pulses, mut link, mut sink) = make_service(MonitorConfig::default());

    pulses.add(100);
    assert!(svc.poll(1_000, &mut link, &mut sink).is_some());
    assert_eq!(link.sent[0], "13.50,-1,0.93,-1\n");
    assert!(approx(svc.tank().current_volume_ml(), 186.5));

    pulses.add(50);
    let report = svc.poll(2_000, &mut link, &mut sink).unwrap();
    assert!(report.delivered);
    assert!(approx(svc.tank().current_volume_ml(), 179.75));

    let r = link.reading(1);
    assert!(approx(r.instant_rate_ml_s, 6.75));
    assert!(approx(r.average_rate_ml_s.unwrap(), 20.25));
    assert!(approx(r.remaining_fraction, 0.90));
    assert_eq!(r.time_to_empty_s, Some(8));
}

#[test]
fn overdraw_empties_tank_and_reports_sentinels() {
    let (mut svc, pulses, mut link, mut sink) = make_service(MonitorConfig::default());

    // 250 ml worth of pulses against 200 ml.
    pulses.add(1_852);
    svc.poll(1_000, &mut link, &mut sink);

    assert_eq!(svc.tank().current_volume_ml(), 0.0);
    assert_eq!(svc.tank().phase(), TankPhase::Empty);
    assert_eq!(link.sent[0], "0.00,-1,0.00,-1\n");
    assert_eq!(sink.count(|e| *e == AppEvent::Emptied), 1);

    // Staying empty does not re-announce.
    pulses.add(10);
    svc.poll(2_000, &mut link, &mut sink);
    assert_eq!(link.sent[1], "0.00,-1,0.00,-1\n");
    assert_eq!(sink.count(|e| *e == AppEvent::Emptied), 1);
}

#[test]
fn refill_from_empty_restarts_tracking() {
    let (mut svc, pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    pulses.add(5_000);
    svc.poll(1_000, &mut link, &mut sink);
    assert!(svc.tank().is_empty());

    link.queue("RT:150");
    let report = svc.poll(2_000, &mut link, &mut sink).unwrap();
    assert_eq!(report.command, Some(Command::RefillTo(150.0)));
    assert_eq!(svc.tank().phase(), TankPhase::Active);
    assert_eq!(svc.tank().initial_volume_ml(), 150.0);
    assert_eq!(svc.tank().current_volume_ml(), 150.0);
    assert!(svc.tank().baseline_ms().is_none());

    // First tick after the refill: average and time-to-empty unknown.
    pulses.add(100);
    svc.poll(3_000, &mut link, &mut sink);
    let r = link.last_reading();
    assert!(approx(r.instant_rate_ml_s, 13.5));
    assert_eq!(r.average_rate_ml_s, None);
    assert_eq!(r.time_to_empty_s, None);

    // Second tick: baseline established one interval ago.
    svc.poll(4_000, &mut link, &mut sink);
    let r = link.last_reading();
    assert!(approx(r.average_rate_ml_s.unwrap(), 13.5));
}

#[test]
fn at_most_one_inbound_line_per_tick() {
    let (mut svc, _pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    link.queue("XYZ");
    link.queue("RT:150");

    let first = svc.poll(1_000, &mut link, &mut sink).unwrap();
    assert_eq!(first.command, None);
    assert_eq!(svc.tank().current_volume_ml(), 200.0);
    assert_eq!(link.inbound.len(), 1);

    let second = svc.poll(2_000, &mut link, &mut sink).unwrap();
    assert_eq!(second.command, Some(Command::RefillTo(150.0)));
    assert_eq!(svc.tank().current_volume_ml(), 150.0);
}

#[test]
fn unrecognized_line_changes_nothing() {
    let (mut svc, pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    pulses.add(100);
    svc.poll(1_000, &mut link, &mut sink);
    let before = svc.tank().clone();

    link.queue("XYZ");
    svc.poll(2_000, &mut link, &mut sink);
    assert_eq!(svc.tank().initial_volume_ml(), before.initial_volume_ml());
    assert_eq!(svc.tank().current_volume_ml(), before.current_volume_ml());
    assert_eq!(svc.tank().baseline_ms(), before.baseline_ms());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Refilled { .. })), 0);
}

#[test]
fn garbage_amount_is_refill_to_zero_when_lenient() {
    let (mut svc, _pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    link.queue("RT:abc");
    svc.poll(1_000, &mut link, &mut sink);
    assert_eq!(svc.tank().phase(), TankPhase::Empty);
    assert_eq!(svc.tank().initial_volume_ml(), 0.0);
}

#[test]
fn garbage_amount_is_ignored_when_strict() {
    let config = MonitorConfig {
        strict_command_parsing: true,
        ..MonitorConfig::default()
    };
    let (mut svc, _pulses, mut link, mut sink) = make_service(config);
    link.queue("RT:abc");
    let report = svc.poll(1_000, &mut link, &mut sink).unwrap();
    assert_eq!(report.command, None);
    assert_eq!(svc.tank().current_volume_ml(), 200.0);
}

#[test]
fn delivery_failure_leaves_tank_untouched_and_next_tick_proceeds() {
    let (mut svc, pulses, mut link, mut sink) = make_service(MonitorConfig::default());

    link.fail_sends = true;
    pulses.add(100);
    let report = svc.poll(1_000, &mut link, &mut sink).unwrap();
    assert!(!report.delivered);
    assert!(link.sent.is_empty());
    assert_eq!(svc.delivery_failures(), 1);
    assert!(approx(svc.tank().current_volume_ml(), 186.5));
    assert!(sink.events.contains(&AppEvent::DeliveryFailed { tick: 1 }));

    link.fail_sends = false;
    pulses.add(50);
    let report = svc.poll(2_000, &mut link, &mut sink).unwrap();
    assert!(report.delivered);
    assert_eq!(svc.tick_count(), 2);
    assert!(approx(link.last_reading().average_rate_ml_s.unwrap(), 20.25));
}

#[test]
fn commands_are_still_read_when_delivery_fails() {
    let (mut svc, _pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    link.fail_sends = true;
    link.queue("RST");
    let report = svc.poll(1_000, &mut link, &mut sink).unwrap();
    assert_eq!(report.command, Some(Command::Reset));
}

#[test]
fn ack_timeout_comes_from_config() {
    let config = MonitorConfig {
        ack_timeout_ms: 100,
        ..MonitorConfig::default()
    };
    let (mut svc, _pulses, mut link, mut sink) = make_service(config);
    svc.poll(1_000, &mut link, &mut sink);
    assert_eq!(link.ack_timeouts, [Duration::from_millis(100)]);
}

#[test]
fn refill_between_ticks_restarts_the_schedule() {
    let (mut svc, _pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    assert!(svc.poll(1_000, &mut link, &mut sink).is_some());

    svc.apply_command(Command::RefillTo(120.0), 1_500, &mut sink);
    assert_eq!(svc.ms_until_next_tick(1_500), Some(1_000));
    assert!(svc.poll(2_000, &mut link, &mut sink).is_none());
    assert!(svc.poll(2_500, &mut link, &mut sink).is_some());
}

#[test]
fn refill_with_and_reset_over_the_link() {
    let (mut svc, pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    pulses.add(1_000); // 135 ml
    link.queue("RW:100");
    svc.poll(1_000, &mut link, &mut sink);
    assert!(approx(svc.tank().current_volume_ml(), 165.0));
    assert!(approx(svc.tank().initial_volume_ml(), 165.0));

    link.queue("RST");
    svc.poll(2_000, &mut link, &mut sink);
    assert_eq!(svc.tank().current_volume_ml(), 200.0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::Refilled { .. })),
        2
    );
}

#[test]
fn stopped_service_does_not_tick() {
    let (mut svc, _pulses, mut link, mut sink) = make_service(MonitorConfig::default());
    svc.stop();
    assert!(!svc.is_running());
    assert!(svc.poll(10_000, &mut link, &mut sink).is_none());
    assert_eq!(link.receive_polls, 0);
}

#[test]
fn late_poll_runs_one_tick_and_counts_the_rest_as_skipped() {
    let (mut svc, pulses, mut link, mut sink) = make_service(MonitorConfig::default());

    pulses.add(100);
    assert!(svc.poll(5_500, &mut link, &mut sink).is_some());
    assert_eq!(svc.tick_count(), 1);
    assert_eq!(svc.skipped_ticks(), 4);
    assert_eq!(link.sent.len(), 1);
    assert_eq!(svc.ms_until_next_tick(5_500), Some(1_000));
    assert!(svc.poll(6_000, &mut link, &mut sink).is_none());
}
