//! Integration tests for the switch → debounce → gesture → relay pipeline.
//!
//! Everything runs on the host against the mock bench; the only thing
//! that is real is the unit itself.

use std::panic::{AssertUnwindSafe, catch_unwind};

use relayswitch::config::{UnitConfig, WindowMode};
use relayswitch::drivers::relay::RelayState;
use relayswitch::error::Error;
use relayswitch::gesture::Gesture;
use relayswitch::unit::{SwitchRelayUnit, UnitState};

use crate::mock_hw::{Bench, BenchUnit, HwCall};

const TIMEOUT_MS: u32 = 1000;

fn setup() -> (Bench, BenchUnit) {
    let bench = Bench::new();
    let config = UnitConfig {
        window_timeout_ms: TIMEOUT_MS,
        ..UnitConfig::default()
    };
    let unit = bench.unit(config);
    bench.clear_calls();
    (bench, unit)
}

/// Clean presses, all inside one window.
fn press(bench: &Bench, unit: &mut BenchUnit, n: u32) {
    for _ in 0..n {
        bench.flip();
        assert_eq!(unit.check().unwrap(), None);
    }
}

fn expire(bench: &Bench, unit: &mut BenchUnit) -> Option<Gesture> {
    bench.advance(TIMEOUT_MS + 1);
    unit.check().unwrap()
}

// ── Construction ─────────────────────────────────────────────

#[test]
fn construction_forces_relay_off_and_seeds_switch_level() {
    let bench = Bench::new();
    bench.set_level(true);
    let unit = bench.unit(UnitConfig::default());

    assert_eq!(bench.calls(), vec![HwCall::RelayWrite(false)]);
    assert_eq!(unit.relay_state(), RelayState::Off);
    assert!(unit.prev_switch_state());
    assert_eq!(unit.state(), UnitState::Idle);
    assert!(!unit.recovered());
}

#[test]
fn invalid_config_is_rejected() {
    let bench = Bench::new();
    let config = UnitConfig {
        debounce_ms: 0,
        ..UnitConfig::default()
    };
    let res = SwitchRelayUnit::new(config, bench.switch(), bench.relay(), bench.platform());
    assert!(matches!(res, Err(Error::Config(_))));
}

// ── Gestures ─────────────────────────────────────────────────

#[test]
fn single_press_turns_relay_on_and_reports_one() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 1);

    assert_eq!(expire(&bench, &mut unit), Some(Gesture::Toggle));
    assert_eq!(unit.relay_state(), RelayState::On);
    assert_eq!(bench.relay_writes(), vec![true]);

    let status = unit.outbox_mut().take_status().unwrap();
    assert_eq!(status.payload(), "1");
    assert_eq!(unit.press_count(), 0);
}

#[test]
fn single_press_when_on_turns_relay_off_and_reports_zero() {
    let (bench, mut unit) = setup();
    unit.switch_device(RelayState::On).unwrap();
    unit.outbox_mut().take_status();

    press(&bench, &mut unit, 1);
    assert_eq!(expire(&bench, &mut unit), Some(Gesture::Toggle));
    assert_eq!(unit.relay_state(), RelayState::Off);
    assert_eq!(unit.outbox_mut().take_status().map(RelayState::payload), Some("0"));
}

#[test]
fn double_press_raises_special_once_without_touching_relay() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 2);

    assert_eq!(expire(&bench, &mut unit), Some(Gesture::SpecialNotify));
    assert!(bench.relay_writes().is_empty());
    assert_eq!(unit.relay_state(), RelayState::Off);
    assert_eq!(unit.outbox().peek_status(), None);

    assert!(unit.outbox_mut().take_special());
    assert!(!unit.outbox_mut().take_special());
    assert_eq!(unit.outbox().overruns(), 0);

    // Nothing further on later polls.
    bench.advance(5_000);
    assert_eq!(unit.check().unwrap(), None);
    assert!(unit.outbox().is_empty());
}

#[test]
fn triple_press_toggles_like_single() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 3);
    assert_eq!(unit.state(), UnitState::Counting { presses: 3 });

    assert_eq!(expire(&bench, &mut unit), Some(Gesture::Toggle));
    assert_eq!(unit.relay_state(), RelayState::On);
    assert_eq!(unit.outbox().peek_status(), Some(RelayState::On));
}

#[test]
fn four_presses_do_nothing_and_reset() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 4);

    assert_eq!(expire(&bench, &mut unit), Some(Gesture::Unmapped(4)));
    assert!(bench.relay_writes().is_empty());
    assert!(unit.outbox().is_empty());
    assert_eq!(unit.press_count(), 0);
    assert_eq!(unit.state(), UnitState::Idle);
}

#[test]
fn six_presses_blink_then_restart() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 6);
    bench.clear_calls();
    bench.advance(TIMEOUT_MS + 1);

    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let _ = unit.check();
    }));
    assert!(outcome.is_err(), "restart gesture must never return");

    assert_eq!(
        bench.calls(),
        vec![
            HwCall::RelayWrite(false),
            HwCall::Delay(300),
            HwCall::RelayWrite(true),
            HwCall::Delay(300),
            HwCall::RelayWrite(false),
            HwCall::Delay(300),
            HwCall::RelayWrite(true),
            HwCall::Delay(300),
            HwCall::RelayWrite(false),
            HwCall::Restart,
        ]
    );
}

#[test]
fn restart_pulse_spacing_follows_config() {
    let bench = Bench::new();
    let mut unit = bench.unit(UnitConfig {
        restart_pulse_ms: 120,
        ..UnitConfig::default()
    });
    press(&bench, &mut unit, 6);
    bench.clear_calls();
    bench.advance(TIMEOUT_MS + 1);

    let _ = catch_unwind(AssertUnwindSafe(|| {
        let _ = unit.check();
    }));

    let delays: Vec<_> = bench
        .calls()
        .into_iter()
        .filter(|c| matches!(c, HwCall::Delay(_)))
        .collect();
    assert_eq!(delays, vec![HwCall::Delay(120); 4]);
}

// ── Counting & window ────────────────────────────────────────

#[test]
fn press_count_tracks_confirmed_presses() {
    let (bench, mut unit) = setup();
    for n in 1..=5 {
        press(&bench, &mut unit, 1);
        assert_eq!(unit.press_count(), n);
    }
    expire(&bench, &mut unit);
    assert_eq!(unit.press_count(), 0);
}

#[test]
fn elapsed_is_zero_right_after_first_press() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 1);
    expire(&bench, &mut unit);

    // Long idle gap since the previous window closed.
    bench.advance(3_600_000);
    press(&bench, &mut unit, 1);

    assert_eq!(unit.elapsed_ms(), 0);
    assert_eq!(unit.window_start_ms(), unit.last_change_ms());
}

#[test]
fn stale_single_press_dispatches_on_a_later_poll() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 1);
    let start = unit.window_start_ms();

    let mut polls = 0;
    let gesture = loop {
        bench.advance(100);
        polls += 1;
        if let Some(g) = unit.check().unwrap() {
            break g;
        }
        assert!(polls < 20, "window never expired");
    };

    assert_eq!(gesture, Gesture::Toggle);
    assert!(bench.now().wrapping_sub(start) > TIMEOUT_MS);
}

#[test]
fn fixed_window_closes_on_the_late_press() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 1);
    bench.advance(800);
    press(&bench, &mut unit, 1);
    bench.advance(800);

    // The third press lands after the window: counted, then acted on at once.
    bench.flip();
    assert_eq!(unit.check().unwrap(), Some(Gesture::Toggle));
    assert_eq!(unit.relay_state(), RelayState::On);
}

#[test]
fn sliding_window_keeps_spaced_presses_together() {
    let bench = Bench::new();
    let mut unit = bench.unit(UnitConfig {
        window_timeout_ms: TIMEOUT_MS,
        window_mode: WindowMode::Sliding,
        ..UnitConfig::default()
    });

    for _ in 0..3 {
        press(&bench, &mut unit, 1);
        bench.advance(800);
    }
    assert_eq!(unit.press_count(), 3);
    assert_eq!(expire(&bench, &mut unit), Some(Gesture::Toggle));
}

#[test]
fn zero_window_dispatches_on_next_poll() {
    let bench = Bench::new();
    let mut unit = bench.unit(UnitConfig {
        window_timeout_ms: 0,
        ..UnitConfig::default()
    });

    press(&bench, &mut unit, 1);
    assert_eq!(unit.press_count(), 1);

    bench.advance(1);
    assert_eq!(unit.check().unwrap(), Some(Gesture::Toggle));
    assert_eq!(unit.relay_state(), RelayState::On);
}

#[test]
fn shared_state_and_control_topic_is_accepted() {
    let bench = Bench::new();
    let config = UnitConfig::new(14, 12, "dev/light", "dev/light", "x", 300).unwrap();
    let mut unit = bench.unit(config);
    assert_eq!(unit.state_topic(), unit.control_topic());

    press(&bench, &mut unit, 1);
    bench.advance(301);
    assert_eq!(unit.check().unwrap(), Some(Gesture::Toggle));
}

// ── Debounce ─────────────────────────────────────────────────

#[test]
fn noise_spike_is_not_a_press() {
    let (bench, mut unit) = setup();
    // Line reads HIGH for six samples, then settles back LOW.
    bench.inject(&[true; 6]);

    assert_eq!(unit.check().unwrap(), None);
    assert_eq!(unit.press_count(), 0);
    assert!(!unit.prev_switch_state());

    bench.advance(5_000);
    assert_eq!(unit.check().unwrap(), None);
    assert!(bench.relay_writes().is_empty());
}

#[test]
fn tied_spin_leaves_state_unchanged() {
    let bench = Bench::new();
    let mut unit = bench.unit(UnitConfig {
        debounce_ms: 51,
        ..UnitConfig::default()
    });
    // One HIGH for the edge read, then a 50-sample spin split 25/25.
    bench.inject(&[true; 26]);

    assert_eq!(unit.check().unwrap(), None);
    assert_eq!(unit.press_count(), 0);
    assert!(!unit.prev_switch_state());
    assert_eq!(unit.state(), UnitState::Idle);
}

#[test]
fn bouncy_press_is_counted_once() {
    let (bench, mut unit) = setup();
    bench.set_level(true);
    bench.inject(&[true, false, true, false]);

    assert_eq!(unit.check().unwrap(), None);
    assert_eq!(unit.press_count(), 1);
    assert!(unit.prev_switch_state());

    // Line is now steady at the confirmed level: no further presses.
    assert_eq!(unit.check().unwrap(), None);
    assert_eq!(unit.press_count(), 1);
}

// ── Actuator ─────────────────────────────────────────────────

#[test]
fn switch_device_twice_reports_each_time() {
    let (bench, mut unit) = setup();

    unit.switch_device(RelayState::On).unwrap();
    assert_eq!(unit.relay_state(), RelayState::On);
    assert_eq!(unit.outbox_mut().take_status(), Some(RelayState::On));

    unit.switch_device(RelayState::On).unwrap();
    assert_eq!(unit.relay_state(), RelayState::On);
    assert_eq!(unit.outbox_mut().take_status(), Some(RelayState::On));

    assert_eq!(bench.relay_writes(), vec![true, true]);
}

#[test]
fn out_of_domain_target_is_ignored() {
    let (bench, mut unit) = setup();

    assert!(!unit.switch_device_raw(2).unwrap());
    assert!(!unit.switch_device_raw(255).unwrap());
    assert_eq!(unit.relay_state(), RelayState::Off);
    assert!(unit.outbox().is_empty());
    assert!(bench.relay_writes().is_empty());

    assert!(unit.switch_device_raw(1).unwrap());
    assert_eq!(unit.relay_state(), RelayState::On);
}

#[test]
fn relay_fault_leaves_state_and_outbox_untouched() {
    let (bench, mut unit) = setup();
    bench.fail_relay(true);

    let err = unit.switch_device(RelayState::On).unwrap_err();
    assert!(matches!(err, Error::Actuator(_)));
    assert_eq!(unit.relay_state(), RelayState::Off);
    assert!(unit.outbox().is_empty());
}

#[test]
fn failed_toggle_is_not_replayed() {
    let (bench, mut unit) = setup();
    press(&bench, &mut unit, 1);
    bench.fail_relay(true);
    bench.advance(TIMEOUT_MS + 1);

    assert!(unit.check().is_err());
    assert_eq!(unit.press_count(), 0);

    bench.fail_relay(false);
    assert_eq!(unit.check().unwrap(), None);
    assert_eq!(unit.relay_state(), RelayState::Off);
}
