//! RelaySwitch Firmware — Main Entry Point
//!
//! Single-unit polling loop: no interrupts, no tasks of our own.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  PinDriver (switch)   PinDriver (relay)   EspPlatform      │
//! │  (InputPin)           (OutputPin)         (Clock+Delay+    │
//! │                                            Restart)        │
//! │  LogPublisher (Publisher)                                  │
//! │                                                            │
//! │  ───────────────── Port Trait Boundary ─────────────────   │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │  SwitchRelayUnit ──▶ Outbox ──▶ ReportService        │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::PinDriver;
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use relayswitch::adapters::log_publisher::LogPublisher;
use relayswitch::adapters::platform::EspPlatform;
use relayswitch::app::service::ReportService;
use relayswitch::config::UnitConfig;
use relayswitch::unit::SwitchRelayUnit;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RelaySwitch v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Pins ───────────────────────────────────────────────
    // Must match pins::SWITCH_GPIO / pins::RELAY_GPIO used by the default config.
    let peripherals = Peripherals::take()?;
    let switch = PinDriver::input(peripherals.pins.gpio14)?;
    let relay = PinDriver::output(peripherals.pins.gpio12)?;

    // ── 3. Unit + reporting ───────────────────────────────────
    let config = UnitConfig::default();
    let mut unit = SwitchRelayUnit::new(config, switch, relay, EspPlatform::new())?;
    let mut publisher = LogPublisher::new();
    let mut reporter = ReportService::new();

    info!("System ready. Entering polling loop.");

    // ── 4. Polling loop ───────────────────────────────────────
    loop {
        if let Err(e) = unit.check() {
            warn!("poll: {}", e);
        }

        reporter.flush(&mut unit, &mut publisher);

        // One tick for the idle task so the task watchdog stays fed.
        FreeRtos::delay_ms(1);
    }
}
