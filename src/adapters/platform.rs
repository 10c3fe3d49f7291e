//! Platform adapter — clock, blocking delay and SoC restart.
//!
//! Implements [`Clock`], [`Restart`] and `embedded_hal::delay::DelayNs`, and
//! therefore [`Platform`](crate::app::ports::Platform).
//!
//! On ESP-IDF the delay is a FreeRTOS delay and the restart is
//! `esp_restart()`.  On the host the delay sleeps the thread and a restart
//! ends the simulation process.

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{Clock, Restart};

#[derive(Default)]
pub struct EspPlatform {
    time: Esp32TimeAdapter,
}

impl EspPlatform {
    pub fn new() -> Self {
        Self {
            time: Esp32TimeAdapter::new(),
        }
    }
}

impl Clock for EspPlatform {
    fn now_ms(&self) -> u32 {
        self.time.now_ms()
    }
}

impl DelayNs for EspPlatform {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1_000));
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

impl Restart for EspPlatform {
    #[cfg(target_os = "espidf")]
    fn restart(&mut self) -> ! {
        warn!("platform: esp_restart()");
        esp_idf_hal::reset::restart()
    }

    #[cfg(not(target_os = "espidf"))]
    fn restart(&mut self) -> ! {
        warn!("platform(sim): restart requested, exiting");
        std::process::exit(0)
    }
}
