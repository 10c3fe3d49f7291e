//! Majority-sampling debounce.
//!
//! When a poll sees the switch at a level different from the last confirmed
//! one, [`MajorityDebouncer::confirm`] spins for a fixed duration, sampling
//! the input as fast as it can.  Samples at the candidate (new) level are
//! *supportive*, samples back at the old level are *unsupportive*.  The
//! change is real only if supportive samples strictly outnumber
//! unsupportive ones; a tie is noise.
//!
//! The spin is deliberately synchronous and non-yielding: its verdict
//! depends on sampling density, so it blocks the caller (and the whole
//! polling loop) for the full duration on every suspected transition.

use embedded_hal::digital::{Error as _, InputPin};
use log::trace;

use crate::app::ports::Clock;
use crate::error::InputError;

/// Outcome of one confirmation spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verdict {
    /// Samples that agreed with the candidate level.
    pub supportive: u32,
    /// Samples that agreed with the previously confirmed level.
    pub unsupportive: u32,
}

impl Verdict {
    /// Tally a sample stream against a candidate level.
    pub fn tally(samples: impl IntoIterator<Item = bool>, candidate: bool) -> Self {
        let mut verdict = Self::default();
        for sample in samples {
            verdict.record(sample == candidate);
        }
        verdict
    }

    fn record(&mut self, supportive: bool) {
        if supportive {
            self.supportive = self.supportive.saturating_add(1);
        } else {
            self.unsupportive = self.unsupportive.saturating_add(1);
        }
    }

    /// Strict majority for the candidate.
    pub fn confirmed(&self) -> bool {
        self.supportive > self.unsupportive
    }

    pub fn samples(&self) -> u32 {
        self.supportive.saturating_add(self.unsupportive)
    }
}

pub struct MajorityDebouncer {
    spin_ms: u32,
}

impl MajorityDebouncer {
    pub fn new(spin_ms: u32) -> Self {
        Self { spin_ms }
    }

    pub fn spin_ms(&self) -> u32 {
        self.spin_ms
    }

    /// Spin for `spin_ms`, sampling `pin` against `candidate`.
    pub fn confirm<P, C>(&self, pin: &mut P, clock: &C, candidate: bool) -> Result<Verdict, InputError>
    where
        P: InputPin,
        C: Clock,
    {
        let start = clock.now_ms();
        let mut verdict = Verdict::default();

        while clock.now_ms().wrapping_sub(start) < self.spin_ms {
            let level = pin
                .is_high()
                .map_err(|e| InputError::GpioReadFailed(e.kind()))?;
            verdict.record(level == candidate);
        }

        trace!(
            "debounce: candidate={} supportive={} unsupportive={}",
            candidate, verdict.supportive, verdict.unsupportive
        );
        Ok(verdict)
    }
}
