//! Bus-Typ-Katalog
//!
//! Statisches Wissen über alle unterstützten Bus-Technologien:
//! Anzahl benötigter Pins, Farbkanäle und Speicherbedarf pro Pixel.
//! Alle Funktionen sind `const fn`, damit die Default-Konfiguration
//! schon zur Compile-Zeit geprüft werden kann.

/// Maximale Anzahl Pins pro Bus (Daten, Takt, PWM-Kanäle, IP-Oktette)
pub const OUTPUT_MAX_PINS: usize = 5;

/// Bus-Technologie
///
/// Die Discriminants entsprechen den Typ-Codes im gespeicherten
/// Konfigurationsformat (`"type"` Feld eines Bus-Eintrags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BusType {
    // Single-Wire Digital (Clockless)
    Ws2812Rgb = 22,
    Ws2811Slow = 24,
    Tm1829 = 25,
    Apa106 = 27,
    Fw1906 = 28,
    Sk6812Rgbw = 30,
    Tm1814 = 31,
    Ws2805 = 32,

    // On/Off und PWM (analog)
    OnOff = 40,
    Analog1Ch = 41,
    Analog2Ch = 42,
    Analog3Ch = 43,
    Analog4Ch = 44,
    Analog5Ch = 45,

    // 2-Pin Digital (Daten + Takt)
    Ws2801 = 50,
    Apa102 = 51,
    Lpd8806 = 52,
    P9813 = 53,

    // Virtuell (Netzwerk-Ausgabe)
    NetDdpRgb = 80,
    NetE131Rgb = 81,
    NetArtnetRgb = 82,
    NetDdpRgbw = 88,
}

impl BusType {
    /// Typ-Code im gespeicherten Format
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Typ aus gespeichertem Code (Bit 7 = Refresh-Flag muss vorher entfernt sein)
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            22 => Self::Ws2812Rgb,
            24 => Self::Ws2811Slow,
            25 => Self::Tm1829,
            27 => Self::Apa106,
            28 => Self::Fw1906,
            30 => Self::Sk6812Rgbw,
            31 => Self::Tm1814,
            32 => Self::Ws2805,
            40 => Self::OnOff,
            41 => Self::Analog1Ch,
            42 => Self::Analog2Ch,
            43 => Self::Analog3Ch,
            44 => Self::Analog4Ch,
            45 => Self::Analog5Ch,
            50 => Self::Ws2801,
            51 => Self::Apa102,
            52 => Self::Lpd8806,
            53 => Self::P9813,
            80 => Self::NetDdpRgb,
            81 => Self::NetE131Rgb,
            82 => Self::NetArtnetRgb,
            88 => Self::NetDdpRgbw,
            _ => return None,
        })
    }

    pub const fn is_two_pin(self) -> bool {
        matches!(self.code(), 48..=63)
    }

    /// Adressierbarer Digital-Bus (Single-Wire oder 2-Pin)
    pub const fn is_digital(self) -> bool {
        matches!(self.code(), 16..=39) || self.is_two_pin()
    }

    pub const fn is_pwm(self) -> bool {
        matches!(self.code(), 41..=47)
    }

    pub const fn is_on_off(self) -> bool {
        self.code() == 40
    }

    pub const fn is_virtual(self) -> bool {
        matches!(self.code(), 80..=95)
    }

    /// PWM oder On/Off: feste Länge 1, kein Pixel-Buffer
    pub const fn is_analog(self) -> bool {
        self.is_pwm() || self.is_on_off()
    }

    /// Anzahl benötigter Pins
    ///
    /// - Single-Wire Digital, On/Off: 1
    /// - 2-Pin Digital: 2 (Daten, Takt)
    /// - PWM: ein Pin pro Kanal
    /// - Virtuell: 4 (IP-Adresse, Oktette statt GPIOs)
    pub const fn required_pins(self) -> usize {
        if self.is_virtual() {
            4
        } else if self.is_pwm() {
            (self.code() - 40) as usize
        } else if self.is_two_pin() {
            2
        } else {
            1
        }
    }

    /// Farbkanäle pro Pixel (3 = RGB, 4 = RGBW, 5 = RGB + CCT)
    pub const fn channels(self) -> u8 {
        match self {
            Self::Sk6812Rgbw | Self::Tm1814 | Self::NetDdpRgbw => 4,
            Self::Fw1906 | Self::Ws2805 => 5,
            Self::OnOff | Self::Analog1Ch => 1,
            Self::Analog2Ch => 2,
            Self::Analog4Ch => 4,
            Self::Analog5Ch => 5,
            _ => 3,
        }
    }

    /// Speicherbedarf pro Pixel in Bytes
    ///
    /// Nicht-digitale Typen haben keinen Pixel-Buffer (0 Bytes).
    /// `first_of_group`: erster Bus einer Parallel-Ausgabe-Gruppe, trägt
    /// zusätzlich den gemeinsamen Sende-Buffer der Gruppe.
    pub const fn per_pixel_memory_cost(self, first_of_group: bool) -> usize {
        if !self.is_digital() {
            return 0;
        }
        let channels = self.channels() as usize;
        if first_of_group { channels * 2 } else { channels }
    }
}

impl TryFrom<u8> for BusType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_pins_per_family() {
        assert_eq!(BusType::Ws2812Rgb.required_pins(), 1);
        assert_eq!(BusType::Apa102.required_pins(), 2);
        assert_eq!(BusType::OnOff.required_pins(), 1);
        assert_eq!(BusType::Analog3Ch.required_pins(), 3);
        assert_eq!(BusType::Analog5Ch.required_pins(), OUTPUT_MAX_PINS);
        assert_eq!(BusType::NetE131Rgb.required_pins(), 4);
    }

    #[test]
    fn test_predicates_are_disjoint_for_analog_and_digital() {
        for ty in [BusType::OnOff, BusType::Analog1Ch, BusType::Analog4Ch] {
            assert!(ty.is_analog());
            assert!(!ty.is_digital());
            assert!(!ty.is_virtual());
        }
        assert!(BusType::Ws2801.is_digital());
        assert!(BusType::Ws2801.is_two_pin());
        assert!(!BusType::Sk6812Rgbw.is_two_pin());
    }

    #[test]
    fn test_memory_cost() {
        assert_eq!(BusType::Ws2812Rgb.per_pixel_memory_cost(false), 3);
        assert_eq!(BusType::Ws2812Rgb.per_pixel_memory_cost(true), 6);
        assert_eq!(BusType::Sk6812Rgbw.per_pixel_memory_cost(false), 4);
        assert_eq!(BusType::Analog3Ch.per_pixel_memory_cost(true), 0);
        assert_eq!(BusType::NetDdpRgb.per_pixel_memory_cost(false), 0);
    }

    #[test]
    fn test_code_roundtrip_and_unknown() {
        assert_eq!(BusType::from_code(22), Some(BusType::Ws2812Rgb));
        assert_eq!(BusType::from_code(0), None);
        assert_eq!(BusType::try_from(99u8), Err(99));
    }
}
