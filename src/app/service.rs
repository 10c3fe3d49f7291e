//! Reporting service — the messaging side of a unit.
//!
//! [`ReportService`] is the consumer half of the unit's
//! [`Outbox`](crate::outbox::Outbox) and the entry point for inbound control
//! messages.  All network I/O flows through the [`Publisher`] port, so the
//! whole path is testable with a recording mock.
//!
//! ```text
//!  SwitchRelayUnit ──▶ Outbox ──▶ ┌───────────────┐ ──▶ Publisher
//!        ▲                        │ ReportService │
//!        └──── switch_device ◀─── └───────────────┘ ◀── control topic
//! ```

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, info, warn};

use crate::error::Result;
use crate::unit::SwitchRelayUnit;

use super::commands::ControlCommand;
use super::ports::{Platform, Publisher};

/// Delivery counters, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    pub published: u32,
    pub failed: u32,
    pub commands: u32,
    pub ignored: u32,
}

#[derive(Debug, Default)]
pub struct ReportService {
    stats: ReportStats,
}

impl ReportService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain the unit's outbox into `publisher`.
    ///
    /// Status goes to the state topic as a retained `"0"`/`"1"`; the special
    /// notification publishes the configured payload on the same topic.
    /// An entry whose publish fails is handed back to the outbox for the
    /// next call.  Returns the number of messages published.
    pub fn flush<I, O, P>(
        &mut self,
        unit: &mut SwitchRelayUnit<I, O, P>,
        publisher: &mut impl Publisher,
    ) -> usize
    where
        I: InputPin,
        O: OutputPin,
        P: Platform,
    {
        let mut sent = 0;

        if let Some(state) = unit.outbox_mut().take_status() {
            match publisher.publish(unit.state_topic(), state.payload().as_bytes(), true) {
                Ok(()) => {
                    sent += 1;
                    self.stats.published = self.stats.published.wrapping_add(1);
                }
                Err(e) => {
                    warn!("report: status {} not published ({})", state.payload(), e);
                    self.stats.failed = self.stats.failed.wrapping_add(1);
                    unit.outbox_mut().restore_status(state);
                }
            }
        }

        if unit.outbox_mut().take_special() {
            match publisher.publish(unit.state_topic(), unit.special_payload().as_bytes(), false) {
                Ok(()) => {
                    sent += 1;
                    self.stats.published = self.stats.published.wrapping_add(1);
                }
                Err(e) => {
                    warn!("report: special notification not published ({})", e);
                    self.stats.failed = self.stats.failed.wrapping_add(1);
                    unit.outbox_mut().restore_special();
                }
            }
        }

        sent
    }

    /// Handle one inbound message.  Returns `true` if it switched the relay.
    ///
    /// Messages on other topics and undecodable payloads are ignored.
    pub fn handle_control<I, O, P>(
        &mut self,
        unit: &mut SwitchRelayUnit<I, O, P>,
        topic: &str,
        payload: &[u8],
    ) -> Result<bool>
    where
        I: InputPin,
        O: OutputPin,
        P: Platform,
    {
        if topic != unit.control_topic() {
            return Ok(false);
        }

        let Some(cmd) = ControlCommand::decode(payload) else {
            debug!("report: ignoring control payload {:?}", payload);
            self.stats.ignored = self.stats.ignored.wrapping_add(1);
            return Ok(false);
        };

        self.stats.commands = self.stats.commands.wrapping_add(1);
        unit.switch_device(cmd.target())?;
        Ok(true)
    }

    /// Restore the relay from the retained control value after a restart.
    ///
    /// Acts once: the first call marks the unit recovered (even when the
    /// payload is unusable, so a bad retained value cannot loop), later
    /// calls are no-ops.  Returns `true` if the relay was switched.
    pub fn reconcile<I, O, P>(
        &mut self,
        unit: &mut SwitchRelayUnit<I, O, P>,
        retained: &[u8],
    ) -> Result<bool>
    where
        I: InputPin,
        O: OutputPin,
        P: Platform,
    {
        if unit.recovered() {
            return Ok(false);
        }
        unit.set_recovered(true);

        match ControlCommand::decode(retained) {
            Some(cmd) => {
                info!("report: restoring relay to {} after restart", cmd.target().payload());
                unit.switch_device(cmd.target())?;
                Ok(true)
            }
            None => {
                warn!("report: retained control value unusable, keeping relay OFF");
                Ok(false)
            }
        }
    }

    pub fn stats(&self) -> ReportStats {
        self.stats
    }
}
