//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements                | Connects to                 |
//! |-----------------|---------------------------|-----------------------------|
//! | `log_publisher` | Publisher                 | Serial log output           |
//! | `platform`      | Clock + Restart + DelayNs | ESP timer, FreeRTOS, reset  |
//! | `time`          | Clock                     | ESP32 system timer          |
//!
//! GPIO needs no adapter: `esp-idf-hal`'s `PinDriver` implements the
//! `embedded-hal` pin traits the unit consumes directly.

pub mod log_publisher;
pub mod platform;
pub mod time;
