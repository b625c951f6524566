//! Pin-Liste eines Busses
//!
//! Feste Kapazität von [`OUTPUT_MAX_PINS`] Einträgen, die Reihenfolge ist
//! relevant (Daten, Takt, Enable ...). Freie Slots enthalten
//! [`PIN_UNASSIGNED`].

use crate::bus_type::OUTPUT_MAX_PINS;

/// GPIO-Nummer
pub type Pin = u8;

/// Sentinel für einen nicht belegten Pin-Slot
pub const PIN_UNASSIGNED: Pin = 255;

/// Geordnete Pin-Liste eines Busses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinSpec {
    pins: [Pin; OUTPUT_MAX_PINS],
}

impl Default for PinSpec {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PinSpec {
    pub const EMPTY: Self = Self {
        pins: [PIN_UNASSIGNED; OUTPUT_MAX_PINS],
    };

    /// Übernimmt höchstens [`OUTPUT_MAX_PINS`] Pins, der Rest wird ignoriert
    pub fn from_slice(pins: &[Pin]) -> Self {
        let mut spec = Self::EMPTY;
        for (slot, pin) in spec.pins.iter_mut().zip(pins) {
            *slot = *pin;
        }
        spec
    }

    /// Pins aus dem gespeicherten Format (negativ oder > 254 = nicht belegt)
    pub fn from_config(pins: &[i16]) -> Self {
        let mut spec = Self::EMPTY;
        for (slot, pin) in spec.pins.iter_mut().zip(pins) {
            *slot = Pin::try_from(*pin).unwrap_or(PIN_UNASSIGNED);
        }
        spec
    }

    pub fn get(&self, index: usize) -> Option<Pin> {
        self.pins
            .get(index)
            .copied()
            .filter(|pin| *pin != PIN_UNASSIGNED)
    }

    /// Setzt einen Slot; Index außerhalb der Kapazität wird ignoriert
    pub fn set(&mut self, index: usize, pin: Pin) {
        if let Some(slot) = self.pins.get_mut(index) {
            *slot = pin;
        }
    }

    /// Alle belegten Pins in Slot-Reihenfolge
    pub fn iter(&self) -> impl Iterator<Item = Pin> + '_ {
        self.pins.iter().copied().filter(|pin| *pin != PIN_UNASSIGNED)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Belegte Slots ab Slot 0 bis zur ersten Lücke
    pub fn leading_len(&self) -> usize {
        self.pins.iter().take_while(|pin| **pin != PIN_UNASSIGNED).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, pin: Pin) -> bool {
        pin != PIN_UNASSIGNED && self.pins.contains(&pin)
    }

    /// Rohe Slots inkl. Sentinel (für das gespeicherte Format)
    pub fn as_slots(&self) -> &[Pin; OUTPUT_MAX_PINS] {
        &self.pins
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PinSpec {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "[");
        for (i, pin) in self.iter().enumerate() {
            if i > 0 {
                defmt::write!(fmt, ", ");
            }
            defmt::write!(fmt, "{}", pin);
        }
        defmt::write!(fmt, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_truncates_to_capacity() {
        let spec = PinSpec::from_slice(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(spec.len(), OUTPUT_MAX_PINS);
        assert!(!spec.contains(6));
    }

    #[test]
    fn test_from_config_maps_negative_to_unassigned() {
        let spec = PinSpec::from_config(&[-1, 4]);
        assert_eq!(spec.get(0), None);
        assert_eq!(spec.get(1), Some(4));
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.leading_len(), 0);
    }

    #[test]
    fn test_unassigned_is_never_contained() {
        assert!(!PinSpec::EMPTY.contains(PIN_UNASSIGNED));
        assert!(PinSpec::EMPTY.is_empty());
    }
}
