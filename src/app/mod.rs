//! Application layer — pure logic around the unit, zero I/O.
//!
//! Inbound commands, the reporting service and the port traits the
//! adapters implement.  All interaction with hardware and the network
//! happens through [`ports`], keeping this layer testable without a board.

pub mod commands;
pub mod ports;
pub mod service;
