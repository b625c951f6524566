// Bus Preview Task - zeigt über RMT, dass der erste Bus lebt
use defmt::{error, info};
use embassy_time::{Duration, Timer};
use esp_bus_core::{BusPreview, PIN_UNASSIGNED, SmartLedWriter};
use esp_hal::gpio::AnyPin;
use esp_hal_smartled::smart_led_buffer;

use crate::config::{BLINK_INTERVAL_SECS, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;

/// Preview Logic - ohne Hardware-Abhängigkeit
///
/// Schreibt im Blink-Intervall die nächste Farbe der Test-Anzeige, in der
/// Farbreihenfolge des Busses.
pub async fn bus_preview_logic<L: SmartLedWriter>(mut led: L, mut preview: BusPreview) {
    info!(
        "Preview on GPIO{} ({})",
        preview.bus().pins.get(0).unwrap_or(PIN_UNASSIGNED),
        preview.order()
    );
    loop {
        match preview.advance(&mut led) {
            Ok(color) => info!("Preview: r={} g={} b={}", color.r, color.g, color.b),
            Err(e) => error!("Failed to write to LED: {}", e),
        }

        // Async Delay: gibt CPU an andere Tasks zurück
        Timer::after(Duration::from_secs(BLINK_INTERVAL_SECS)).await;
    }
}

/// Bus Preview Task - Embassy Task für parallele Ausführung
///
/// # Parameter
/// - `data_pin`: Daten-Pin des ersten Single-Wire Busses
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `preview`: Bus und Farbreihenfolge
#[embassy_executor::task]
pub async fn bus_preview_task(
    data_pin: AnyPin<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    preview: BusPreview,
) {
    // Buffer für SmartLED Daten erstellen (1 LED)
    let mut rmt_buffer = smart_led_buffer!(1);

    let led = match RmtLedWriter::new(data_pin, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => led,
        Err(e) => {
            error!("RMT init failed: {}", e);
            return;
        }
    };

    bus_preview_logic(led, preview).await;
}
