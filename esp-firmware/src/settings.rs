// Gespeicherte Bus-Konfiguration und Peripherie-Pins
//
// Die Bus-Einträge kommen als JSON (Format der hw.led Sektion) aus der
// Build-Zeit Variable LED_BUS_CONFIG. Fehlt sie oder ist sie ungültig,
// werden die Default-Busse aus config.rs genutzt.

use defmt::{info, warn};
use esp_bus_core::{LedSettings, PeripheralConfig};
use heapless::Vec;

use crate::config::{BUTTON_PINS, I2C_PINS, IR_PIN, RELAY_PIN, SPI_PINS};

/// Eingebackene Bus-Konfiguration (siehe build.rs)
pub const LED_BUS_CONFIG: Option<&str> = option_env!("LED_BUS_CONFIG");

/// Parst eine `hw.led` Sektion
pub fn parse_settings(json: &str) -> Result<LedSettings, serde_json_core::de::Error> {
    serde_json_core::from_str::<LedSettings>(json).map(|(settings, _consumed)| settings)
}

/// Lädt die eingebackene Bus-Konfiguration
///
/// `None` → Default-Busse.
pub fn load_settings() -> Option<LedSettings> {
    let Some(json) = LED_BUS_CONFIG else {
        info!("LED_BUS_CONFIG not set");
        return None;
    };
    match parse_settings(json) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("LED_BUS_CONFIG invalid: {}", defmt::Debug2Format(&e));
            None
        }
    }
}

/// Peripherie-Pins aus config.rs
pub fn peripheral_config() -> PeripheralConfig {
    PeripheralConfig {
        buttons: Vec::from_slice(&BUTTON_PINS).ok(),
        ir: Some(IR_PIN),
        relay: Some(RELAY_PIN),
        i2c: Some(I2C_PINS),
        spi: Some(SPI_PINS),
    }
}
