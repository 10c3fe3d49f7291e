//! Unit → reporter notification handoff.
//!
//! Single producer (the unit, inside `check()` / `switch_device()`), single
//! consumer (the reporter, between polls).  Each channel holds at most one
//! outstanding entry.  Posting onto an occupied channel keeps one entry
//! (the newest status wins) and counts an overrun, so a reporter that falls
//! behind shows up in the logs instead of silently losing edges.
//!
//! Entries are taken, not peeked: `take_*` clears the channel.  A reporter
//! whose publish fails hands the entry back with `restore_*`.

use log::warn;

use crate::drivers::relay::RelayState;

#[derive(Debug, Default)]
pub struct Outbox {
    status: Option<RelayState>,
    special: bool,
    overruns: u32,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a relay state report.
    pub fn post_status(&mut self, state: RelayState) {
        if let Some(stale) = self.status.replace(state) {
            self.overruns = self.overruns.wrapping_add(1);
            warn!(
                "outbox: status {} overwritten by {} before it was drained",
                stale.payload(),
                state.payload()
            );
        }
    }

    /// Queue the special-gesture notification.
    pub fn post_special(&mut self) {
        if self.special {
            self.overruns = self.overruns.wrapping_add(1);
            warn!("outbox: special notification still pending");
        }
        self.special = true;
    }

    pub fn take_status(&mut self) -> Option<RelayState> {
        self.status.take()
    }

    pub fn take_special(&mut self) -> bool {
        core::mem::take(&mut self.special)
    }

    /// Hand back a status the reporter failed to deliver.  A newer status
    /// posted in the meantime takes precedence.
    pub fn restore_status(&mut self, state: RelayState) {
        if self.status.is_none() {
            self.status = Some(state);
        }
    }

    pub fn restore_special(&mut self) {
        self.special = true;
    }

    pub fn peek_status(&self) -> Option<RelayState> {
        self.status
    }

    pub fn has_special(&self) -> bool {
        self.special
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && !self.special
    }

    /// Number of posts that landed on an occupied channel.
    pub fn overruns(&self) -> u32 {
        self.overruns
    }
}
