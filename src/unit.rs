//! One wall switch driving one relay.
//!
//! ```text
//!   check() ──▶ edge detector ──▶ press counter ──▶ window expired? ──▶ gesture
//!                (majority spin)   (+ window start)                      │
//!                                                   ┌────────────────────┤
//!                                                   ▼          ▼         ▼
//!                                               Toggle   SpecialNotify  Restart (terminal)
//!                                                  │          │
//!                                                  ▼          ▼
//!                                           switch_device   Outbox ◀── reporter drains
//! ```
//!
//! The outer loop calls [`SwitchRelayUnit::check`] once per iteration.  The
//! only blocking it does is the debounce spin on a suspected transition and
//! the pulse sequence before a restart.  `&mut self` everywhere means
//! `check()` and `switch_device()` can never overlap.

use embedded_hal::digital::{Error as _, InputPin, OutputPin};
use log::{debug, error, info, trace, warn};

use crate::app::ports::Platform;
use crate::config::{UnitConfig, WindowMode};
use crate::drivers::debounce::MajorityDebouncer;
use crate::drivers::relay::{RelayDriver, RelayState};
use crate::error::{InputError, Result};
use crate::gesture::{Gesture, RESTART_PATTERN};
use crate::outbox::Outbox;

/// Coarse unit state, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// No presses pending.
    Idle,
    /// Presses accumulating in an open window.
    Counting { presses: u32 },
}

pub struct SwitchRelayUnit<I, O, P> {
    config: UnitConfig,
    switch: I,
    relay: RelayDriver<O>,
    platform: P,
    debouncer: MajorityDebouncer,

    /// Latest raw reading.
    switch_state: bool,
    /// Last debounce-confirmed level.
    prev_switch_state: bool,

    press_count: u32,
    window_start_ms: u32,
    last_change_ms: u32,
    /// Window age as computed by the most recent `check()`.
    elapsed_ms: u32,

    outbox: Outbox,
    recovered: bool,
}

impl<I, O, P> SwitchRelayUnit<I, O, P>
where
    I: InputPin,
    O: OutputPin,
    P: Platform,
{
    /// Force the relay OFF and seed the confirmed switch level from the pin.
    pub fn new(config: UnitConfig, mut switch: I, relay_pin: O, platform: P) -> Result<Self> {
        config.validate()?;

        let relay = RelayDriver::new(relay_pin)?;
        let initial = read_level(&mut switch)?;
        let debouncer = MajorityDebouncer::new(config.debounce_ms);

        info!(
            "unit: switch GPIO{} (level={}) relay GPIO{} OFF | window={}ms {:?} debounce={}ms",
            config.switch_pin,
            u8::from(initial),
            config.relay_pin,
            config.window_timeout_ms,
            config.window_mode,
            config.debounce_ms
        );

        Ok(Self {
            config,
            switch,
            relay,
            platform,
            debouncer,
            switch_state: initial,
            prev_switch_state: initial,
            press_count: 0,
            window_start_ms: 0,
            last_change_ms: 0,
            elapsed_ms: 0,
            outbox: Outbox::new(),
            recovered: false,
        })
    }

    /// One polling step: detect a debounced press, then act on the window
    /// if it has expired.  Returns the gesture dispatched this step.
    ///
    /// Never returns when the window holds the restart gesture.
    pub fn check(&mut self) -> Result<Option<Gesture>> {
        let pressed_at = self.detect_edge()?;
        self.dispatch_if_expired(pressed_at)
    }

    /// Drive the relay and report the new state.
    ///
    /// Reports every call, even when the relay is already at `target`.
    pub fn switch_device(&mut self, target: RelayState) -> Result<()> {
        self.relay.set(target)?;
        self.outbox.post_status(target);
        info!("relay GPIO{}: {}", self.config.relay_pin, target.payload());
        Ok(())
    }

    /// [`switch_device`](Self::switch_device) for an untyped level.  Only
    /// `0` and `1` act; anything else is ignored.  Returns whether it acted.
    pub fn switch_device_raw(&mut self, raw: u8) -> Result<bool> {
        match RelayState::try_from(raw) {
            Ok(target) => self.switch_device(target).map(|()| true),
            Err(other) => {
                debug!("relay GPIO{}: ignoring target {}", self.config.relay_pin, other);
                Ok(false)
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    pub fn switch_pin(&self) -> i32 {
        self.config.switch_pin
    }

    pub fn relay_pin(&self) -> i32 {
        self.config.relay_pin
    }

    pub fn state_topic(&self) -> &str {
        &self.config.state_topic
    }

    pub fn control_topic(&self) -> &str {
        &self.config.control_topic
    }

    pub fn special_payload(&self) -> &str {
        &self.config.special_payload
    }

    pub fn relay_state(&self) -> RelayState {
        self.relay.state()
    }

    pub fn switch_state(&self) -> bool {
        self.switch_state
    }

    pub fn prev_switch_state(&self) -> bool {
        self.prev_switch_state
    }

    pub fn press_count(&self) -> u32 {
        self.press_count
    }

    pub fn window_start_ms(&self) -> u32 {
        self.window_start_ms
    }

    pub fn last_change_ms(&self) -> u32 {
        self.last_change_ms
    }

    /// Window age seen by the last `check()`; 0 while no press is pending.
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn state(&self) -> UnitState {
        match self.press_count {
            0 => UnitState::Idle,
            presses => UnitState::Counting { presses },
        }
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    /// Set by external reconciliation after a restart; never by the unit.
    pub fn recovered(&self) -> bool {
        self.recovered
    }

    pub fn set_recovered(&mut self, recovered: bool) {
        self.recovered = recovered;
    }

    // ── Internal ──────────────────────────────────────────────

    /// Returns the timestamp of a press confirmed during this call.
    fn detect_edge(&mut self) -> Result<Option<u32>> {
        let level = read_level(&mut self.switch)?;
        self.switch_state = level;
        if level == self.prev_switch_state {
            return Ok(None);
        }

        let verdict = self
            .debouncer
            .confirm(&mut self.switch, &self.platform, level)?;
        if !verdict.confirmed() {
            trace!(
                "switch GPIO{}: noise rejected ({}/{})",
                self.config.switch_pin, verdict.supportive, verdict.unsupportive
            );
            return Ok(None);
        }

        let now = self.platform.now_ms();
        if self.press_count == 0 || self.config.window_mode == WindowMode::Sliding {
            self.window_start_ms = now;
        }
        self.prev_switch_state = level;
        self.press_count = self.press_count.saturating_add(1);
        self.last_change_ms = now;

        debug!(
            "switch GPIO{}: press {} confirmed ({}/{} samples)",
            self.config.switch_pin,
            self.press_count,
            verdict.supportive,
            verdict.samples()
        );
        Ok(Some(now))
    }

    fn dispatch_if_expired(&mut self, pressed_at: Option<u32>) -> Result<Option<Gesture>> {
        if self.press_count == 0 {
            self.elapsed_ms = 0;
            return Ok(None);
        }

        let now = pressed_at.unwrap_or_else(|| self.platform.now_ms());
        self.elapsed_ms = now.wrapping_sub(self.window_start_ms);
        if self.elapsed_ms <= self.config.window_timeout_ms {
            return Ok(None);
        }

        let presses = self.press_count;
        let gesture = Gesture::classify(presses);
        info!(
            "switch GPIO{}: {} press(es) in {}ms -> {:?}",
            self.config.switch_pin, presses, self.elapsed_ms, gesture
        );

        // Consumed before acting: a failed relay write must not replay the
        // gesture on the next poll.
        self.press_count = 0;
        self.elapsed_ms = 0;

        match gesture {
            Gesture::Toggle => {
                let target = self.relay.state().toggled();
                self.switch_device(target)?;
            }
            Gesture::SpecialNotify => self.outbox.post_special(),
            Gesture::Restart => self.restart(),
            Gesture::Unmapped(_) => {}
        }
        Ok(Some(gesture))
    }

    fn restart(&mut self) -> ! {
        warn!(
            "relay GPIO{}: reset gesture, blinking then restarting",
            self.config.relay_pin
        );
        if let Err(e) = self.relay.pulse_sequence(
            &mut self.platform,
            &RESTART_PATTERN,
            self.config.restart_pulse_ms,
        ) {
            error!("relay GPIO{}: reset blink failed: {}", self.config.relay_pin, e);
        }
        self.platform.restart()
    }
}

fn read_level<I: InputPin>(pin: &mut I) -> core::result::Result<bool, InputError> {
    pin.is_high()
        .map_err(|e| InputError::GpioReadFailed(e.kind()))
}
