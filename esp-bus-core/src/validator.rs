//! Prüfung der Pin-Anforderungen einer Default-Konfiguration
//!
//! Gibt es mehr Busse als Typen, wird der letzte Typ wiederholt. Die
//! Pin-Liste ist daher gültig, wenn sie genau für alle Typen reicht oder der
//! Überschuss ein Vielfaches der Pins des letzten Typs ist.

use crate::bus_type::BusType;

/// Summe der benötigten Pins aller Typen
pub const fn required_pins(types: &[BusType]) -> usize {
    let mut sum = 0;
    let mut i = 0;
    while i < types.len() {
        sum += types[i].required_pins();
        i += 1;
    }
    sum
}

/// Ist die Kombination aus Bus-Typen und Pin-Anzahl erfüllbar?
///
/// ```
/// # use esp_bus_core::{BusType, is_satisfiable};
/// const TYPES: [BusType; 2] = [BusType::Ws2812Rgb, BusType::Ws2812Rgb];
/// const _: () = assert!(is_satisfiable(&TYPES, 3));
/// assert!(!is_satisfiable(&[BusType::Apa102], 3));
/// ```
pub const fn is_satisfiable(types: &[BusType], available_pins: usize) -> bool {
    let required = required_pins(types);
    if available_pins < required {
        return false;
    }
    if available_pins == required {
        return true;
    }
    match types.last() {
        Some(last) => (available_pins - required) % last.required_pins() == 0,
        None => false,
    }
}
