//! Unit configuration parameters
//!
//! Everything a [`SwitchRelayUnit`](crate::unit::SwitchRelayUnit) needs at
//! construction: pin assignments, the pass-through messaging identifiers,
//! and the gesture timing.  Fixed for the lifetime of the unit.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Capacity of topic strings.
pub const TOPIC_CAP: usize = 64;
/// Capacity of the special-command payload string.
pub const PAYLOAD_CAP: usize = 32;

/// Where the gesture window is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindowMode {
    /// Window runs from the first press of a gesture.
    #[default]
    Fixed,
    /// Window restarts on every confirmed press, so a gesture ends
    /// `window_timeout_ms` after its last press.
    Sliding,
}

/// Per switch+relay pair configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    // --- Pins ---
    /// GPIO number of the wall switch input.
    pub switch_pin: i32,
    /// GPIO number of the relay output.
    pub relay_pin: i32,

    // --- Messaging (opaque, passed through to the publisher) ---
    /// Topic the relay state ("0"/"1") is reported on.
    pub state_topic: String<TOPIC_CAP>,
    /// Topic inbound on/off commands arrive on.
    pub control_topic: String<TOPIC_CAP>,
    /// Payload published for the double-press gesture.
    pub special_payload: String<PAYLOAD_CAP>,

    // --- Timing ---
    /// Majority-sampling spin per suspected transition (milliseconds)
    pub debounce_ms: u32,
    /// Gesture window after which the press count is acted on (milliseconds)
    pub window_timeout_ms: u32,
    /// Spacing between writes of the restart pulse sequence (milliseconds)
    pub restart_pulse_ms: u32,
    #[serde(default)]
    pub window_mode: WindowMode,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            switch_pin: pins::SWITCH_GPIO,
            relay_pin: pins::RELAY_GPIO,

            state_topic: bounded("relayswitch/state"),
            control_topic: bounded("relayswitch/control"),
            special_payload: bounded("special"),

            debounce_ms: 50,
            window_timeout_ms: 1000,
            restart_pulse_ms: 300,
            window_mode: WindowMode::Fixed,
        }
    }
}

impl UnitConfig {
    /// Build a config for the given pins and messaging identifiers, with
    /// default debounce and restart timing.
    ///
    /// Strings longer than their capacity are rejected.
    pub fn new(
        switch_pin: i32,
        relay_pin: i32,
        state_topic: &str,
        control_topic: &str,
        special_payload: &str,
        window_timeout_ms: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            switch_pin,
            relay_pin,
            state_topic: String::try_from(state_topic)
                .map_err(|_| ConfigError::ValidationFailed("state_topic too long"))?,
            control_topic: String::try_from(control_topic)
                .map_err(|_| ConfigError::ValidationFailed("control_topic too long"))?,
            special_payload: String::try_from(special_payload)
                .map_err(|_| ConfigError::ValidationFailed("special_payload too long"))?,
            window_timeout_ms,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config blob (as provisioned) and validate it.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes).map_err(|e| {
            log::warn!("config: rejecting malformed JSON ({})", e);
            ConfigError::Malformed
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Range-check every field.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.switch_pin < 0 || self.relay_pin < 0 {
            return Err(ConfigError::ValidationFailed("pin numbers must be >= 0"));
        }
        if self.switch_pin == self.relay_pin {
            return Err(ConfigError::ValidationFailed(
                "switch and relay must use different pins",
            ));
        }
        if self.state_topic.is_empty() || self.control_topic.is_empty() {
            return Err(ConfigError::ValidationFailed("topics must not be empty"));
        }
        // A zero spin takes no samples and would never confirm a press.
        if self.debounce_ms == 0 {
            return Err(ConfigError::ValidationFailed("debounce_ms must be > 0"));
        }
        Ok(())
    }
}

fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
