//! RelaySwitch firmware library.
//!
//! A wall switch polled from the main loop drives a relay: presses are
//! debounced by majority sampling, counted inside a time window, and the
//! count selects a gesture (toggle, special notification, restart).
//!
//! Exposes the pure-logic modules for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod gesture;
pub mod outbox;
pub mod pins;
pub mod unit;

pub use error::{Error, Result};
pub use unit::SwitchRelayUnit;
