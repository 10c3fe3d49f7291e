//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SwitchRelayUnit / ReportService (domain)
//! ```
//!
//! GPIO and blocking delays come straight from `embedded-hal` 1.0
//! (`InputPin`, `OutputPin`, `DelayNs`).  The ports below cover what
//! `embedded-hal` does not: a monotonic clock, the terminal restart
//! capability, and the outbound publisher.

use embedded_hal::delay::DelayNs;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
///
/// Wraps at `u32::MAX` like an MCU `millis()` counter; every consumer uses
/// `wrapping_sub` so the rollover every ~49 days is harmless.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Restart port (driven adapter: domain → SoC reset)
// ───────────────────────────────────────────────────────────────

/// The irrecoverable device restart triggered by the reset gesture.
///
/// Never returns.  Test doubles typically record the call and panic.
pub trait Restart {
    fn restart(&mut self) -> !;
}

/// Everything a unit needs from the platform besides its two pins.
pub trait Platform: Clock + Restart + DelayNs {}

impl<T: Clock + Restart + DelayNs> Platform for T {}

// ───────────────────────────────────────────────────────────────
// Publisher port (driven adapter: domain → messaging)
// ───────────────────────────────────────────────────────────────

/// Outbound messaging.  MQTT in production; a serial log on the bench.
pub trait Publisher {
    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), PublishError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`Publisher`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// No connection to the broker.
    Disconnected,
    /// Outgoing buffer is full; retry on a later poll.
    QueueFull,
}

impl core::fmt::Display for PublishError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "publisher disconnected"),
            Self::QueueFull => write!(f, "publish queue full"),
        }
    }
}
