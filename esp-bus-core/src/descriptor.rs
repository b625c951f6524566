//! Bus-Beschreibung: alles, was die Bus-Initialisierung für einen Ausgang braucht

use crate::bus_type::{BusType, OUTPUT_MAX_PINS};
use crate::color_order::{ColorOrder, WhiteSwap};
use crate::error::RecordError;
use crate::pins::{Pin, PinSpec};

/// Standard-Strom pro LED in mA
pub const LED_MILLIAMPS_DEFAULT: u8 = 55;

/// Standard-Stromgrenze pro Ausgang in mA
pub const ABL_MILLIAMPS_DEFAULT: u16 = 850;

/// Automatische Weiß-Berechnung für RGBW-Busse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AutoWhiteMode {
    #[default]
    ManualOnly = 0,
    Brighter = 1,
    Accurate = 2,
    Dual = 3,
    Max = 4,
}

impl AutoWhiteMode {
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Brighter,
            2 => Self::Accurate,
            3 => Self::Dual,
            4 => Self::Max,
            _ => Self::ManualOnly,
        }
    }
}

/// Konfiguration eines Ausgangs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusDescriptor {
    pub bus_type: BusType,
    pub pins: PinSpec,
    /// Erstes Pixel im globalen Pixelraum
    pub start: u16,
    pub length: u16,
    pub color_order: ColorOrder,
    pub white_swap: WhiteSwap,
    pub reversed: bool,
    /// Anzahl vorgeschalteter Pixel, die nicht angesteuert werden
    pub skip: u8,
    /// Strip braucht Refresh auch im ausgeschalteten Zustand
    pub refresh_on_off: bool,
    pub auto_white: AutoWhiteMode,
    /// kHz für getaktete Busse, Hz für PWM, 0 = Standard
    pub frequency: u16,
    pub milliamps_per_led: u8,
    pub milliamps_max: u16,
}

impl BusDescriptor {
    /// Bus mit Standardwerten; analoge und virtuelle Busse ohne Strombegrenzung
    pub fn new(bus_type: BusType, pins: PinSpec, start: u16, length: u16) -> Self {
        let (milliamps_per_led, milliamps_max) = if bus_type.is_analog() || bus_type.is_virtual() {
            (0, 0)
        } else {
            (LED_MILLIAMPS_DEFAULT, ABL_MILLIAMPS_DEFAULT)
        };
        Self {
            bus_type,
            pins,
            start,
            length,
            color_order: ColorOrder::default(),
            white_swap: WhiteSwap::default(),
            reversed: false,
            skip: 0,
            refresh_on_off: false,
            auto_white: AutoWhiteMode::default(),
            frequency: 0,
            milliamps_per_led,
            milliamps_max,
        }
    }

    pub fn with_color_order(mut self, order: ColorOrder) -> Self {
        self.color_order = order;
        self
    }

    /// Letztes Pixel + 1
    pub fn end(&self) -> u32 {
        u32::from(self.start) + u32::from(self.length)
    }

    /// Prüft Pixelbereich und Pin-Anzahl
    ///
    /// Die benötigten Pins müssen lückenlos ab Slot 0 stehen (Slot 0 = Daten).
    pub fn validate(&self, max_leds: u16) -> Result<(), RecordError> {
        if self.pins.is_empty() {
            return Err(RecordError::NoPins);
        }
        let required = self.bus_type.required_pins();
        let given = self.pins.leading_len();
        if given < required {
            return Err(RecordError::TooFewPins {
                required: required as u8,
                given: given as u8,
            });
        }
        if self.length == 0 && !self.bus_type.is_analog() {
            return Err(RecordError::ZeroLength);
        }
        if self.end() > u32::from(max_leds) {
            return Err(RecordError::OutOfRange {
                end: self.end(),
                max: max_leds,
            });
        }
        Ok(())
    }

    /// Pins als `(pin, is_output)` für [`crate::PinRegistry::allocate_multiple`]
    pub fn pin_claims(&self) -> [(Pin, bool); OUTPUT_MAX_PINS] {
        let slots = *self.pins.as_slots();
        slots.map(|pin| (pin, true))
    }

    /// Speicherbedarf des Pixel-Buffers in Bytes (übersprungene Pixel zählen mit)
    pub fn memory_usage(&self, first_of_group: bool) -> usize {
        (usize::from(self.length) + usize::from(self.skip))
            * self.bus_type.per_pixel_memory_cost(first_of_group)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BusDescriptor {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Bus {{ type: {}, pins: {}, pixels: {}..{}, order: {}, rev: {}, skip: {}, mA: {}/{} }}",
            self.bus_type.code(),
            self.pins,
            self.start,
            self.end(),
            self.color_order,
            self.reversed,
            self.skip,
            self.milliamps_per_led,
            self.milliamps_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analog_bus_has_no_current_limit() {
        let bus = BusDescriptor::new(BusType::Analog3Ch, PinSpec::from_slice(&[1, 2, 3]), 0, 1);
        assert_eq!(bus.milliamps_per_led, 0);
        assert_eq!(bus.milliamps_max, 0);
    }

    #[test]
    fn test_validate_rejects_zero_length_digital() {
        let bus = BusDescriptor::new(BusType::Ws2812Rgb, PinSpec::from_slice(&[2]), 0, 0);
        assert_eq!(bus.validate(1000), Err(RecordError::ZeroLength));
    }

    #[test]
    fn test_validate_rejects_range_past_max() {
        let bus = BusDescriptor::new(BusType::Ws2812Rgb, PinSpec::from_slice(&[2]), 900, 101);
        assert_eq!(
            bus.validate(1000),
            Err(RecordError::OutOfRange { end: 1001, max: 1000 })
        );
        let bus = BusDescriptor::new(BusType::Ws2812Rgb, PinSpec::from_slice(&[2]), 900, 100);
        assert_eq!(bus.validate(1000), Ok(()));
    }

    #[test]
    fn test_validate_rejects_missing_clock_pin() {
        let bus = BusDescriptor::new(BusType::Apa102, PinSpec::from_slice(&[2]), 0, 10);
        assert_eq!(
            bus.validate(1000),
            Err(RecordError::TooFewPins {
                required: 2,
                given: 1
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_data_slot() {
        let bus = BusDescriptor::new(BusType::Ws2812Rgb, PinSpec::from_config(&[-1, 4]), 0, 10);
        assert_eq!(
            bus.validate(1000),
            Err(RecordError::TooFewPins {
                required: 1,
                given: 0
            })
        );
    }

    #[test]
    fn test_memory_usage_counts_skipped_pixels() {
        let mut bus = BusDescriptor::new(BusType::Ws2812Rgb, PinSpec::from_slice(&[2]), 0, 100);
        bus.skip = 1;
        assert_eq!(bus.memory_usage(false), 303);
    }
}
