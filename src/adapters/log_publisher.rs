//! Log-based publisher adapter.
//!
//! Implements [`Publisher`] by writing every message to the serial log.
//! Used on the bench and until a broker connection exists; an MQTT adapter
//! implements the same trait.

use log::info;

use crate::app::ports::{PublishError, Publisher};

/// Adapter that logs every publish to the serial console.
#[derive(Default)]
pub struct LogPublisher {
    count: u32,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Publisher for LogPublisher {
    fn publish(&mut self, topic: &str, payload: &[u8], retained: bool) -> Result<(), PublishError> {
        self.count = self.count.wrapping_add(1);
        info!(
            "PUB | {} | {}{}",
            topic,
            core::str::from_utf8(payload).unwrap_or("<binary>"),
            if retained { " | retained" } else { "" }
        );
        Ok(())
    }
}
