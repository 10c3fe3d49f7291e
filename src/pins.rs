//! GPIO pin assignments for the relay switch board.
//!
//! Single source of truth for the default [`UnitConfig`](crate::config::UnitConfig)
//! and the firmware entry point.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Wall switch
// ---------------------------------------------------------------------------

/// Digital input: wall switch (rocker or momentary), external pull-up.
/// Every confirmed level change counts as one press.
pub const SWITCH_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

/// Digital output: relay coil driver, HIGH = energised (load on).
pub const RELAY_GPIO: i32 = 12;
