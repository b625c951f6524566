// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use esp_bus_core::{BusType, ColorOrder, DefaultBusSpec, Limits, Pin};

// ============================================================================
// Plattform
// ============================================================================

/// Grenzen für Busanzahl, Pixelanzahl und Pixel-Buffer
pub const LIMITS: Limits = Limits::ESP32C6;

/// Logging läuft über USB-Serial-JTAG (GPIO12/13 sind dann belegt)
pub const USB_JTAG_LOGGING: bool = true;

/// Heap-Größe für den esp-rtos Scheduler (Bytes)
pub const HEAP_SIZE: usize = 32 * 1024;

// ============================================================================
// Default-Busse (ohne LED_BUS_CONFIG)
// ============================================================================
//
// Gibt es mehr Pins als der erste Typ braucht, entstehen weitere Busse.
// Fehlende Typen bzw. Pixelanzahlen wiederholen den letzten Eintrag.

/// Bus-Typen der Default-Busse
pub const DEFAULT_LED_TYPES: [BusType; 1] = [BusType::Ws2812Rgb];

/// GPIOs der Default-Busse
/// GPIO8 ist die On-Board RGB LED des DevKitC-1
pub const DEFAULT_LED_PINS: [Pin; 2] = [8, 4];

/// Pixelanzahl pro Default-Bus
pub const DEFAULT_LED_COUNTS: [u16; 2] = [1, 30];

/// Farbreihenfolge der Default-Busse
pub const DEFAULT_COLOR_ORDER: ColorOrder = ColorOrder::Grb;

pub const DEFAULT_BUSES: DefaultBusSpec<'static> =
    DefaultBusSpec::new(&DEFAULT_LED_TYPES, &DEFAULT_LED_PINS, &DEFAULT_LED_COUNTS);

// Passt die Pin-Liste nicht zu den Typen, bricht schon der Build ab
const _: () = assert!(
    DEFAULT_BUSES.is_satisfiable(),
    "DEFAULT_LED_PINS passt nicht zu DEFAULT_LED_TYPES"
);

// ============================================================================
// Peripherie-Pins (-1 = nicht genutzt)
// ============================================================================

/// Taster (GPIO9 = BOOT-Taster)
pub const BUTTON_PINS: [i16; 1] = [9];

/// IR-Empfänger
pub const IR_PIN: i16 = -1;

/// Relais für die LED-Versorgung
pub const RELAY_PIN: i16 = -1;

/// I2C `[sda, scl]`
pub const I2C_PINS: [i16; 2] = [-1, -1];

/// SPI `[mosi, sclk, miso]`
pub const SPI_PINS: [i16; 3] = [-1, -1, -1];

// ============================================================================
// Test-Anzeige
// ============================================================================

/// Helligkeits-Level für die Test-Anzeige (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Blink-Intervall in Sekunden
pub const BLINK_INTERVAL_SECS: u64 = 1;

/// Buffer für die JSON-Ausgabe eines Busses im Log
pub const JSON_BUS_BUFFER_SIZE: usize = 256;
