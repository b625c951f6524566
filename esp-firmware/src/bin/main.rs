// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::AnyPin;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::{error, info, warn};

// Projekt-Module und Konfiguration
use esp_led_bus::config::{HEAP_SIZE, LED_BRIGHTNESS, LIMITS, USB_JTAG_LOGGING};
use esp_led_bus::settings::load_settings;
use esp_led_bus::setup::configure_buses;
use esp_led_bus::tasks::bus_preview_task;
use esp_led_bus::{AllocatorContext, BusPreview, Esp32C6Layout};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, konfiguriert die LED-Busse, startet Embassy
/// Runtime und spawnt die Test-Anzeige. Danach schläft main().
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(size: HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Pin-Registry + Grenzen, die Belegung gilt für die gesamte Laufzeit
    static CONTEXT: static_cell::StaticCell<AllocatorContext<Esp32C6Layout>> =
        static_cell::StaticCell::new();
    let context = CONTEXT.init(AllocatorContext::new(
        Esp32C6Layout {
            usb_jtag: USB_JTAG_LOGGING,
        },
        LIMITS,
    ));

    let settings = load_settings();
    match configure_buses(context, settings.as_ref()) {
        Ok(plan) => {
            info!(
                "LED buffer size: {}/{} bytes",
                plan.total_memory,
                LIMITS.max_led_memory
            );
            let preview = BusPreview::for_plan(&plan, LED_BRIGHTNESS);
            match preview.and_then(|preview| Some((preview.data_pin()?, preview))) {
                Some((pin, preview)) => {
                    // SAFETY: Der Pin ist in der Registry als LED-Bus belegt und
                    // wird von keinem anderen Treiber genutzt.
                    let data_pin = unsafe { AnyPin::steal(pin) };
                    spawner
                        .spawn(bus_preview_task(data_pin, peripherals.RMT, preview))
                        .unwrap();
                }
                None => warn!("No single-wire bus with data pin for the preview"),
            }
        }
        Err(e) => error!("Bus configuration failed: {}", e),
    }

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
