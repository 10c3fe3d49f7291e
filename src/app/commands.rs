//! Inbound control commands.
//!
//! The unit never parses message payloads itself.  Whatever receives a
//! message on the control topic decodes it here and calls
//! [`switch_device`](crate::unit::SwitchRelayUnit::switch_device).

use crate::drivers::relay::RelayState;

/// A decoded control-topic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Set(RelayState),
}

impl ControlCommand {
    /// `"0"` → off, `"1"` → on (surrounding ASCII whitespace tolerated).
    /// Anything else is not a command.
    pub fn decode(payload: &[u8]) -> Option<Self> {
        match payload.trim_ascii() {
            b"0" => Some(Self::Set(RelayState::Off)),
            b"1" => Some(Self::Set(RelayState::On)),
            _ => None,
        }
    }

    pub fn target(self) -> RelayState {
        match self {
            Self::Set(state) => state,
        }
    }
}
