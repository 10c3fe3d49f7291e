//! Bistable relay driver.
//!
//! Drives one GPIO output and keeps a local record of the last level
//! written.  The record is updated only after the write succeeds, so
//! [`RelayDriver::state`] always matches the pin.
//!
//! This is a dumb actuator: notifications about state changes are the
//! unit's business, not the driver's.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};

use crate::error::ActuatorError;

/// Commanded relay level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayState {
    #[default]
    Off,
    On,
}

impl RelayState {
    /// Payload used on the state topic.
    pub const fn payload(self) -> &'static str {
        match self {
            Self::Off => "0",
            Self::On => "1",
        }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

impl From<bool> for RelayState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Only `0` and `1` name a relay level.
impl TryFrom<u8> for RelayState {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, u8> {
        match raw {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(other),
        }
    }
}

pub struct RelayDriver<O> {
    pin: O,
    state: RelayState,
}

impl<O: OutputPin> RelayDriver<O> {
    /// Take ownership of the pin and force it OFF.
    pub fn new(pin: O) -> Result<Self, ActuatorError> {
        let mut relay = Self {
            pin,
            state: RelayState::Off,
        };
        relay.write(RelayState::Off)?;
        Ok(relay)
    }

    /// Drive the relay to `target`.
    pub fn set(&mut self, target: RelayState) -> Result<(), ActuatorError> {
        self.write(target)
    }

    /// Write each level in `pattern`, waiting `spacing_ms` between writes.
    /// Blocks for `(pattern.len() - 1) * spacing_ms`.
    pub fn pulse_sequence(
        &mut self,
        delay: &mut impl DelayNs,
        pattern: &[RelayState],
        spacing_ms: u32,
    ) -> Result<(), ActuatorError> {
        for (i, &level) in pattern.iter().enumerate() {
            if i > 0 {
                delay.delay_ms(spacing_ms);
            }
            self.write(level)?;
        }
        Ok(())
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    fn write(&mut self, level: RelayState) -> Result<(), ActuatorError> {
        let res = match level {
            RelayState::On => self.pin.set_high(),
            RelayState::Off => self.pin.set_low(),
        };
        res.map_err(|e| ActuatorError::GpioWriteFailed(e.kind()))?;
        self.state = level;
        Ok(())
    }
}
