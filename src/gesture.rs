//! Press-count gesture vocabulary.
//!
//! | Presses in window | Gesture          | Effect                                  |
//! |-------------------|------------------|-----------------------------------------|
//! | odd (1, 3, 5, …)  | `Toggle`         | relay flips, status published           |
//! | 2                 | `SpecialNotify`  | special payload published, relay intact |
//! | 6                 | `Restart`        | relay blinks, device restarts           |
//! | other even        | `Unmapped(n)`    | nothing, count discarded                |

use crate::drivers::relay::RelayState;

/// Press count that triggers the restart sequence.
pub const RESTART_PRESSES: u32 = 6;
/// Press count that raises the special notification.
pub const SPECIAL_PRESSES: u32 = 2;

/// Relay levels written before the restart, one pulse interval apart.
pub const RESTART_PATTERN: [RelayState; 5] = [
    RelayState::Off,
    RelayState::On,
    RelayState::Off,
    RelayState::On,
    RelayState::Off,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Toggle,
    SpecialNotify,
    /// Terminal: the unit never returns from dispatching this.
    Restart,
    Unmapped(u32),
}

impl Gesture {
    /// Classify a non-zero press count.
    pub const fn classify(presses: u32) -> Self {
        if presses % 2 == 1 {
            Self::Toggle
        } else if presses == SPECIAL_PRESSES {
            Self::SpecialNotify
        } else if presses == RESTART_PRESSES {
            Self::Restart
        } else {
            Self::Unmapped(presses)
        }
    }
}
